//! Grid layout: maps maze cells onto surface coordinates

use crate::maze::{Cell, GridSize};
use crate::rendering::Point;
use crate::surface::Bounds;

/// Size of one cell in surface units. Derived per pass, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    /// Divide the surface evenly between the grid's rows and columns. No
    /// rounding is applied.
    pub fn for_grid(bounds: Bounds, size: GridSize) -> Self {
        Self {
            width: bounds.width / f64::from(size.cols),
            height: bounds.height / f64::from(size.rows),
        }
    }

    pub fn center(&self, cell: Cell) -> Point {
        Point::new(
            f64::from(cell.col) * self.width + self.width / 2.0,
            f64::from(cell.row) * self.height + self.height / 2.0,
        )
    }

    /// Stroke width that leaves `border` units of wall on each side of a passage.
    pub fn passage_width(&self, border: f64) -> f64 {
        self.width - border * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_on_square_grid() {
        let cs = CellSize::for_grid(Bounds::new(100.0, 100.0), GridSize { rows: 2, cols: 2 });
        assert_eq!(cs, CellSize { width: 50.0, height: 50.0 });
        assert_eq!(cs.center(Cell::new(0, 0)), Point::new(25.0, 25.0));
        assert_eq!(cs.center(Cell::new(0, 1)), Point::new(75.0, 25.0));
        assert_eq!(cs.center(Cell::new(1, 1)), Point::new(75.0, 75.0));
        assert_eq!(cs.passage_width(2.0), 46.0);
    }

    #[test]
    fn non_square_cells_keep_fractions() {
        let cs = CellSize::for_grid(Bounds::new(100.0, 30.0), GridSize { rows: 4, cols: 3 });
        assert!((cs.width - 33.333_333).abs() < 1e-5);
        assert_eq!(cs.height, 7.5);
        assert_eq!(cs.center(Cell::new(3, 0)).y, 26.25);
    }
}
