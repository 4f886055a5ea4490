//! Page host: binds the render pass to document events.

use crate::renderer::{MazeRenderer, RenderReport};
use crate::rendering::Context2d;
use crate::surface::{Bounds, MazeElement, Surface, SurfaceKey};
use crate::RenderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The document finished loading.
    Load,
    /// The viewport changed size.
    Resize,
}

/// A set of maze surfaces plus the renderer that paints them.
pub struct Page<S: Surface> {
    surfaces: Vec<S>,
    renderer: MazeRenderer,
}

impl<S: Surface> Page<S> {
    pub fn new(surfaces: Vec<S>, config: RenderConfig) -> Self {
        Self { surfaces, renderer: MazeRenderer::new(config) }
    }

    /// Handle a host event. Returns the pass report when a repaint happened.
    ///
    /// `Resize` only repaints when `rerender_on_resize` is enabled.
    pub fn dispatch(&mut self, event: PageEvent) -> Option<RenderReport> {
        match event {
            PageEvent::Load => Some(self.render()),
            PageEvent::Resize if self.renderer.config().rerender_on_resize => Some(self.render()),
            PageEvent::Resize => {
                log::debug!("resize ignored; re-render on resize is disabled");
                None
            }
        }
    }

    pub fn render(&mut self) -> RenderReport {
        self.renderer.render(&mut self.surfaces)
    }

    pub fn surfaces(&self) -> &[S] {
        &self.surfaces
    }

    pub fn surface(&self, key: &SurfaceKey) -> Option<&S> {
        self.surfaces.iter().find(|s| s.key() == key)
    }

    pub fn renderer(&self) -> &MazeRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut MazeRenderer {
        &mut self.renderer
    }
}

impl<C: Context2d> Page<MazeElement<C>> {
    /// Change a surface's on-screen size, as a layout change would. Does not
    /// repaint. Returns false when no surface has `key`.
    pub fn set_bounds(&mut self, key: &SurfaceKey, bounds: Bounds) -> bool {
        match self.surfaces.iter_mut().find(|s| s.key() == key) {
            Some(surface) => {
                surface.set_bounds(bounds);
                true
            }
            None => false,
        }
    }
}

#[cfg(feature = "html")]
impl Page<MazeElement<crate::rendering::raster::Raster>> {
    /// Discover the maze surfaces of an HTML document.
    pub fn from_html(html: &str, config: RenderConfig) -> crate::Result<Self> {
        let surfaces = crate::document::discover_surfaces(html, &config.class_name)?;
        Ok(Self::new(surfaces, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::PaintRecorder;

    fn page(config: RenderConfig) -> Page<MazeElement<PaintRecorder>> {
        let maze = MazeElement::canvas("m", Bounds::new(40.0, 40.0))
            .with_attribute("data-config", r#"{"size":{"rows":2,"cols":2}}"#)
            .with_attribute("data-passages", "[]");
        Page::new(vec![maze], config)
    }

    fn resets(page: &Page<MazeElement<PaintRecorder>>) -> usize {
        let ctx = page.surfaces()[0].canvas_context().unwrap();
        ctx.commands()
            .iter()
            .filter(|c| matches!(c, crate::rendering::paint::PaintCommand::Reset { .. }))
            .count()
    }

    #[test]
    fn load_renders_and_resize_is_ignored_by_default() {
        let mut p = page(RenderConfig::default());
        assert!(p.dispatch(PageEvent::Load).is_some());
        assert!(p.dispatch(PageEvent::Resize).is_none());
        assert_eq!(resets(&p), 1);
    }

    #[test]
    fn resize_repaints_when_enabled() {
        let mut p = page(RenderConfig { rerender_on_resize: true, ..Default::default() });
        p.dispatch(PageEvent::Load);
        assert!(p.set_bounds(&"m".into(), Bounds::new(80.0, 20.0)));
        let report = p.dispatch(PageEvent::Resize).unwrap();
        assert_eq!(report.rendered.len(), 1);
        assert_eq!(resets(&p), 2);
        assert!(!p.set_bounds(&"missing".into(), Bounds::new(1.0, 1.0)));
    }
}
