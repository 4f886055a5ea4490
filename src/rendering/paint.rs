//! Paint command recording, used to inspect what a render pass draws

use super::{check_canvas_size, Context2d, DrawState, LineCap, Point, Rgba};
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Reset {
        width: u32,
        height: u32,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    },
    Stroke {
        subpaths: Vec<Vec<Point>>,
        color: Rgba,
        line_width: f64,
        line_cap: LineCap,
    },
}

/// A `Context2d` that records commands instead of producing pixels.
#[derive(Debug, Clone, Default)]
pub struct PaintRecorder {
    state: DrawState,
    commands: Vec<PaintCommand>,
}

impl PaintRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn strokes(&self) -> impl Iterator<Item = &PaintCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::Stroke { .. }))
    }

    /// Number of commands that put paint on the surface.
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| !matches!(c, PaintCommand::Reset { .. }))
            .count()
    }
}

impl Context2d for PaintRecorder {
    fn reset(&mut self, width: u32, height: u32) -> Result<()> {
        check_canvas_size(width, height)?;
        self.state = DrawState::default();
        self.commands.push(PaintCommand::Reset { width, height });
        Ok(())
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.state.fill_style = color;
    }

    fn set_stroke_style(&mut self, color: Rgba) {
        self.state.stroke_style = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(PaintCommand::FillRect {
            x,
            y,
            width,
            height,
            color: self.state.fill_style,
        });
    }

    fn begin_path(&mut self) {
        self.state.subpaths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.state.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.state.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.commands.push(PaintCommand::Stroke {
            subpaths: self.state.subpaths.clone(),
            color: self.state.stroke_style,
            line_width: self.state.line_width,
            line_cap: self.state.line_cap,
        });
    }
}
