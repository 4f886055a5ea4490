//! Maze canvas renderer
//!
//! Paints mazes described by element attributes onto canvas surfaces: a
//! background, one stroke per open passage between adjacent cells, and an
//! optional solution route drawn on top.
//!
//! # Features
//!
//! - **html** (default): discover `canvas.maze` elements in HTML documents
//! - **fetch** (default): load documents over HTTP
//! - **Software raster**: anti-aliased canvas-style drawing with PNG export
//! - **Recording context**: capture paint commands for inspection in tests
//!
//! # Example
//!
//! ```
//! use mazecanvas::{MazeElement, MazeRenderer, RenderConfig, Bounds};
//!
//! let mut surfaces: Vec<MazeElement> = vec![MazeElement::canvas("demo", Bounds::new(100.0, 100.0))
//!     .with_attribute("data-config", r#"{"size":{"rows":2,"cols":2}}"#)
//!     .with_attribute("data-passages", "[[[0,0],[0,1]]]")
//!     .with_attribute("data-route", "[[0,0],[0,1]]")];
//!
//! let mut renderer = MazeRenderer::new(RenderConfig::default());
//! let report = renderer.render(&mut surfaces);
//! assert_eq!(report.rendered.len(), 1);
//!
//! let raster: &mazecanvas::Raster = surfaces[0].canvas_context().unwrap();
//! assert_eq!(raster.pixel(50, 25).unwrap().to_string(), "#73C989");
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod maze;
pub mod page;
pub mod renderer;
pub mod rendering;
pub mod surface;

// HTML discovery and document loading
#[cfg(feature = "html")]
pub mod document;

pub use maze::{Cell, GridSize, MazeConfig, MazeData, Passage};
pub use page::{Page, PageEvent};
pub use renderer::{MazeRenderer, RenderReport, SurfaceOptions};
pub use rendering::raster::Raster;
pub use rendering::{Context2d, LineCap, Point, Rgba, Screenshot};
pub use surface::{Bounds, MazeElement, Surface, SurfaceKey};

/// Colours used to paint a maze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Fill behind everything (walls show through in this colour)
    pub background: Rgba,
    /// Carved passages
    pub passage: Rgba,
    /// Solution route
    pub route: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::opaque(0x1C, 0x1F, 0x27),
            passage: Rgba::opaque(0x30, 0x36, 0x44),
            route: Rgba::opaque(0x73, 0xC9, 0x89),
        }
    }
}

/// Configuration for the renderer
///
/// Every field has a default, so a JSON config file only needs the fields it
/// changes:
///
/// ```
/// let cfg: mazecanvas::RenderConfig =
///     serde_json::from_str(r##"{"palette":{"route":"#FF0000"}}"##).unwrap();
/// assert_eq!(cfg.route_width, 4.0);
/// assert_eq!(cfg.palette.route.to_string(), "#FF0000");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub palette: Palette,
    /// Wall left on each side of a passage, in surface units
    pub cell_border_width: f64,
    /// Stroke width of the solution route
    pub route_width: f64,
    /// Route visibility for surfaces seen for the first time
    pub default_show_route: bool,
    /// Repaint on `PageEvent::Resize`
    pub rerender_on_resize: bool,
    /// Class that marks maze elements in a document
    pub class_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            cell_border_width: 2.0,
            route_width: 4.0,
            default_show_route: true,
            rerender_on_resize: false,
            class_name: "maze".to_string(),
        }
    }
}

impl RenderConfig {
    /// Load a JSON config file.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))
    }
}
