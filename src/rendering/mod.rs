//! Rendering module: the 2D drawing surface abstraction and its backends.

pub mod layout;
pub mod paint;
pub mod raster;

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An RGBA colour, written as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| Error::ConfigError(format!("colour {:?} must start with '#'", s)))?;
        let bytes = hex::decode(digits)
            .map_err(|e| Error::ConfigError(format!("colour {:?}: {}", s, e)))?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Rgba::opaque(*r, *g, *b)),
            [r, g, b, a] => Ok(Rgba { r: *r, g: *g, b: *b, a: *a }),
            _ => Err(Error::ConfigError(format!(
                "colour {:?} must have 6 or 8 hex digits",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{}", hex::encode_upper([self.r, self.g, self.b]))
        } else {
            write!(f, "#{}", hex::encode_upper(self.to_array()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Largest backing width or height a context accepts.
pub const MAX_CANVAS_DIMENSION: u32 = 32_767;
/// Largest backing area, in pixels, a context accepts.
pub const MAX_CANVAS_AREA: u64 = 268_435_456;

/// Reject backing sizes above `MAX_CANVAS_DIMENSION` or `MAX_CANVAS_AREA`.
pub fn check_canvas_size(width: u32, height: u32) -> Result<()> {
    let area = u64::from(width) * u64::from(height);
    if width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION || area > MAX_CANVAS_AREA {
        return Err(Error::RenderError(format!(
            "canvas size {}x{} exceeds the {}px / {} pixel limit",
            width, height, MAX_CANVAS_DIMENSION, MAX_CANVAS_AREA
        )));
    }
    Ok(())
}

/// The subset of the canvas 2D context the maze renderer draws with.
///
/// Implementations follow canvas semantics: `reset` behaves like assigning
/// the element's `width`/`height` (clears content and drawing state), and
/// `line_to` without a current point starts a new sub-path.
pub trait Context2d {
    /// Resize the backing store, clearing all pixels and drawing state.
    /// Sizes rejected by `check_canvas_size` fail and leave the context
    /// unchanged.
    fn reset(&mut self, width: u32, height: u32) -> Result<()>;
    fn set_fill_style(&mut self, color: Rgba);
    fn set_stroke_style(&mut self, color: Rgba);
    /// Non-positive or non-finite widths are ignored.
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Stroke the current path with the current stroke state.
    fn stroke(&mut self);
}

/// Drawing state shared by every `Context2d` backend.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawState {
    pub(crate) fill_style: Rgba,
    pub(crate) stroke_style: Rgba,
    pub(crate) line_width: f64,
    pub(crate) line_cap: LineCap,
    pub(crate) subpaths: Vec<Vec<Point>>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill_style: Rgba::BLACK,
            stroke_style: Rgba::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            subpaths: Vec::new(),
        }
    }
}

impl DrawState {
    pub(crate) fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    pub(crate) fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(vec![Point::new(x, y)]);
    }

    pub(crate) fn line_to(&mut self, x: f64, y: f64) {
        match self.subpaths.last_mut() {
            Some(current) => current.push(Point::new(x, y)),
            None => self.move_to(x, y),
        }
    }
}

/// An encoded image of a surface.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Screenshot {
    /// `data:` URL suitable for an `<img src>`, like `canvas.toDataURL()`.
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colours() {
        assert_eq!("#1C1F27".parse::<Rgba>().unwrap(), Rgba::opaque(0x1c, 0x1f, 0x27));
        assert_eq!(
            "#73c98980".parse::<Rgba>().unwrap(),
            Rgba { r: 0x73, g: 0xc9, b: 0x89, a: 0x80 }
        );
        assert!("303644".parse::<Rgba>().is_err());
        assert!("#3036".parse::<Rgba>().is_err());
        assert!("#zzzzzz".parse::<Rgba>().is_err());
    }

    #[test]
    fn colour_display_round_trips_through_serde() {
        let c = Rgba::opaque(0x30, 0x36, 0x44);
        assert_eq!(c.to_string(), "#303644");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#303644\"");
        assert_eq!(serde_json::from_str::<Rgba>(&json).unwrap(), c);
    }

    #[test]
    fn invalid_line_widths_are_ignored() {
        let mut s = DrawState::default();
        s.set_line_width(6.0);
        s.set_line_width(0.0);
        s.set_line_width(-3.0);
        s.set_line_width(f64::NAN);
        s.set_line_width(f64::INFINITY);
        assert_eq!(s.line_width, 6.0);
    }

    #[test]
    fn line_to_without_current_point_starts_subpath() {
        let mut s = DrawState::default();
        s.line_to(1.0, 2.0);
        s.line_to(3.0, 4.0);
        s.move_to(5.0, 6.0);
        assert_eq!(s.subpaths.len(), 2);
        assert_eq!(s.subpaths[0], vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn canvas_size_limits() {
        assert!(check_canvas_size(0, 0).is_ok());
        assert!(check_canvas_size(MAX_CANVAS_DIMENSION, 8192).is_ok());
        assert!(matches!(check_canvas_size(MAX_CANVAS_DIMENSION + 1, 1), Err(Error::RenderError(_))));
        assert!(matches!(check_canvas_size(20_000, 20_000), Err(Error::RenderError(_))));
    }

    #[test]
    fn data_url_has_png_prefix() {
        let shot = Screenshot { width: 1, height: 1, png_data: vec![1, 2, 3] };
        assert_eq!(shot.data_url(), "data:image/png;base64,AQID");
    }
}
