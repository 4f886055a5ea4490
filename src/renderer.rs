//! The maze render pass.

use std::collections::HashMap;

use crate::maze::{MazeData, Passage, CONFIG_ATTR, PASSAGES_ATTR, ROUTE_ATTR};
use crate::rendering::layout::CellSize;
use crate::rendering::LineCap;
use crate::surface::{Surface, SurfaceKey};
use crate::{Error, RenderConfig, Result};

/// Per-surface render options, kept across passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub show_route: bool,
}

/// What happened to each surface during one pass.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub rendered: Vec<SurfaceKey>,
    /// Elements carrying the maze class that are not canvases.
    pub skipped: Vec<SurfaceKey>,
    /// Surfaces whose drawing was abandoned, with the reason.
    pub failed: Vec<(SurfaceKey, Error)>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Paints mazes onto surfaces.
///
/// The renderer owns a side table of `SurfaceOptions` keyed by surface. An
/// entry is created with the configured defaults the first time a surface is
/// rendered and is never reset by later passes.
#[derive(Debug, Default)]
pub struct MazeRenderer {
    config: RenderConfig,
    options: HashMap<SurfaceKey, SurfaceOptions>,
}

impl MazeRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config, options: HashMap::new() }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn options(&self, key: &SurfaceKey) -> Option<SurfaceOptions> {
        self.options.get(key).copied()
    }

    pub fn show_route(&self, key: &SurfaceKey) -> Option<bool> {
        self.options(key).map(|o| o.show_route)
    }

    /// Set the route flag, creating the surface's entry if needed.
    pub fn set_show_route(&mut self, key: &SurfaceKey, show: bool) {
        self.entry(key).show_route = show;
    }

    /// Flip the route flag and return the new value.
    pub fn toggle_route(&mut self, key: &SurfaceKey) -> bool {
        let opts = self.entry(key);
        opts.show_route = !opts.show_route;
        opts.show_route
    }

    fn entry(&mut self, key: &SurfaceKey) -> &mut SurfaceOptions {
        let default = SurfaceOptions { show_route: self.config.default_show_route };
        self.options.entry(key.clone()).or_insert(default)
    }

    /// Run one pass over `surfaces` in order.
    ///
    /// A failure on one surface is logged once and never stops the pass.
    pub fn render<S: Surface>(&mut self, surfaces: &mut [S]) -> RenderReport {
        let mut report = RenderReport::default();

        for surface in surfaces.iter_mut() {
            let key = surface.key().clone();
            if !surface.is_canvas() {
                log::debug!("ignoring non-canvas maze element {} <{}>", key, surface.tag_name());
                report.skipped.push(key);
                continue;
            }

            let options = *self.entry(&key);
            match self.render_surface(surface, options) {
                Ok(()) => report.rendered.push(key),
                Err(e) => {
                    log::warn!("skipping maze {}: {}", key, e);
                    report.failed.push((key, e));
                }
            }
        }

        report
    }

    fn render_surface<S: Surface>(&self, surface: &mut S, options: SurfaceOptions) -> Result<()> {
        let data = MazeData::from_attributes(
            surface.attribute(CONFIG_ATTR),
            surface.attribute(PASSAGES_ATTR),
            surface.attribute(ROUTE_ATTR),
        )?;
        data.validate()?;

        let stray = data.out_of_range_cells();
        if stray > 0 {
            log::debug!("maze {} has {} cells outside its {}x{} grid", surface.key(),
                stray, data.config.size.rows, data.config.size.cols);
        }

        let bounds = surface.bounding_box();
        let cell = CellSize::for_grid(bounds, data.config.size);
        let palette = &self.config.palette;

        let ctx = surface.context()?;
        let (width, height) = bounds.backing_size();
        ctx.reset(width, height)?;

        ctx.set_fill_style(palette.background);
        ctx.fill_rect(0.0, 0.0, bounds.width, bounds.height);

        ctx.set_stroke_style(palette.passage);
        ctx.set_line_width(cell.passage_width(self.config.cell_border_width));
        ctx.set_line_cap(LineCap::Square);
        for Passage(a, b) in &data.passages {
            let (from, to) = (cell.center(*a), cell.center(*b));
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
        }

        if let (true, Some(route)) = (options.show_route, &data.route) {
            ctx.set_stroke_style(palette.route);
            ctx.set_line_width(self.config.route_width);
            ctx.set_line_cap(LineCap::Round);
            ctx.begin_path();
            for (i, c) in route.iter().enumerate() {
                let p = cell.center(*c);
                if i == 0 {
                    ctx.move_to(p.x, p.y);
                } else {
                    ctx.line_to(p.x, p.y);
                }
            }
            ctx.stroke();
        }

        Ok(())
    }
}
