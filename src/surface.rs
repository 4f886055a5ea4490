//! Render targets.
//!
//! A `Surface` is anything the renderer can read maze attributes from and
//! paint onto. `MazeElement` is the concrete element type produced by HTML
//! discovery; tests build it directly with a `PaintRecorder` context.

use std::collections::BTreeMap;
use std::fmt;

use crate::rendering::raster::Raster;
use crate::rendering::Context2d;
use crate::{Error, Result};

/// Stable identity of a surface across render passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceKey(String);

impl SurfaceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// On-screen bounding box of a surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Backing store size for these bounds. Fractions are truncated the way
    /// assigning to `canvas.width` truncates.
    pub fn backing_size(&self) -> (u32, u32) {
        let truncate = |v: f64| if v.is_finite() && v > 0.0 { v as u32 } else { 0 };
        (truncate(self.width), truncate(self.height))
    }
}

pub trait Surface {
    fn key(&self) -> &SurfaceKey;
    /// Element tag, e.g. `canvas`.
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn bounding_box(&self) -> Bounds;
    /// The 2D context, or `ContextUnavailable` when the element has none.
    fn context(&mut self) -> Result<&mut dyn Context2d>;

    fn is_canvas(&self) -> bool {
        self.tag_name().eq_ignore_ascii_case("canvas")
    }
}

/// An element tagged as a maze, with its attributes and drawing context.
#[derive(Debug, Clone)]
pub struct MazeElement<C: Context2d = Raster> {
    key: SurfaceKey,
    tag: String,
    attributes: BTreeMap<String, String>,
    bounds: Bounds,
    context: Option<C>,
}

impl<C: Context2d + Default> MazeElement<C> {
    /// Create an element. Only `canvas` elements receive a drawing context.
    pub fn new(key: impl Into<SurfaceKey>, tag: impl Into<String>, bounds: Bounds) -> Self {
        let tag = tag.into();
        let context = tag.eq_ignore_ascii_case("canvas").then(C::default);
        Self {
            key: key.into(),
            tag,
            attributes: BTreeMap::new(),
            bounds,
            context,
        }
    }

    /// Shorthand for a `canvas` element.
    pub fn canvas(key: impl Into<SurfaceKey>, bounds: Bounds) -> Self {
        Self::new(key, "canvas", bounds)
    }
}

impl<C: Context2d> MazeElement<C> {
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// The drawing context, if this element is a canvas.
    pub fn canvas_context(&self) -> Option<&C> {
        self.context.as_ref()
    }
}

impl<C: Context2d> Surface for MazeElement<C> {
    fn key(&self) -> &SurfaceKey {
        &self.key
    }

    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn bounding_box(&self) -> Bounds {
        self.bounds
    }

    fn context(&mut self) -> Result<&mut dyn Context2d> {
        match self.context.as_mut() {
            Some(ctx) => Ok(ctx),
            None => Err(Error::ContextUnavailable(self.key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::PaintRecorder;

    #[test]
    fn only_canvas_elements_get_a_context() {
        let mut canvas: MazeElement<PaintRecorder> = MazeElement::new("a", "CANVAS", Bounds::new(10.0, 10.0));
        assert!(canvas.is_canvas());
        assert!(canvas.context().is_ok());

        let mut div: MazeElement<PaintRecorder> = MazeElement::new("b", "div", Bounds::new(10.0, 10.0));
        assert!(!div.is_canvas());
        assert!(matches!(div.context(), Err(Error::ContextUnavailable(k)) if k == "b"));
    }

    #[test]
    fn attributes_are_readable() {
        let el: MazeElement = MazeElement::canvas("m", Bounds::new(1.0, 1.0))
            .with_attribute("data-config", "{}");
        assert_eq!(el.attribute("data-config"), Some("{}"));
        assert_eq!(el.attribute("data-route"), None);
    }

    #[test]
    fn backing_size_truncates() {
        assert_eq!(Bounds::new(100.7, 49.2).backing_size(), (100, 49));
        assert_eq!(Bounds::new(-5.0, f64::NAN).backing_size(), (0, 0));
    }
}
