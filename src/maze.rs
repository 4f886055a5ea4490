//! Maze data model and attribute parsing.
//!
//! A maze surface carries its geometry as JSON strings in three attributes.
//! `MazeData::from_attributes` turns those strings into typed values and
//! `MazeData::validate` rejects grids that cannot be laid out.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{Error, Result};

pub const CONFIG_ATTR: &str = "data-config";
pub const PASSAGES_ATTR: &str = "data-passages";
pub const ROUTE_ATTR: &str = "data-route";

/// One grid unit, serialized as `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "[u32; 2]")]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl From<[u32; 2]> for Cell {
    fn from([row, col]: [u32; 2]) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }
}

/// Contents of `data-config`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MazeConfig {
    pub size: GridSize,
}

/// An open wall between two adjacent cells, serialized as `[[rA,cA],[rB,cB]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[Cell; 2]")]
pub struct Passage(pub Cell, pub Cell);

impl From<[Cell; 2]> for Passage {
    fn from([a, b]: [Cell; 2]) -> Self {
        Passage(a, b)
    }
}

/// Everything a render pass needs to paint one surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeData {
    pub config: MazeConfig,
    pub passages: Vec<Passage>,
    pub route: Option<Vec<Cell>>,
}

impl MazeData {
    /// Parse the three maze attributes. `config` and `passages` are required;
    /// an absent `route` or the literal `null` both mean "no route".
    pub fn from_attributes(
        config: Option<&str>,
        passages: Option<&str>,
        route: Option<&str>,
    ) -> Result<Self> {
        let config = config.ok_or(Error::MissingAttribute(CONFIG_ATTR))?;
        let passages = passages.ok_or(Error::MissingAttribute(PASSAGES_ATTR))?;

        let config: MazeConfig = parse_attr(CONFIG_ATTR, config)?;
        let passages: Vec<Passage> = parse_attr(PASSAGES_ATTR, passages)?;
        let route: Option<Vec<Cell>> = match route {
            Some(raw) => parse_attr(ROUTE_ATTR, raw)?,
            None => None,
        };

        Ok(Self { config, passages, route })
    }

    /// Reject grids whose cell size would divide by zero.
    pub fn validate(&self) -> Result<()> {
        let GridSize { rows, cols } = self.config.size;
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidGrid(format!(
                "grid must have at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        Ok(())
    }

    /// Number of passage endpoints and route cells lying outside the grid.
    /// These are drawn anyway.
    pub fn out_of_range_cells(&self) -> usize {
        let size = self.config.size;
        let passage_cells = self
            .passages
            .iter()
            .flat_map(|Passage(a, b)| [*a, *b])
            .filter(|c| !size.contains(*c))
            .count();
        let route_cells = self
            .route
            .iter()
            .flatten()
            .filter(|c| !size.contains(**c))
            .count();
        passage_cells + route_cells
    }
}

fn parse_attr<T: DeserializeOwned>(attribute: &'static str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| Error::MazeData { attribute, source })
}
