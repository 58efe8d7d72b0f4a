use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Location, SearchError, SearchResult};
use crate::Grid;

/// A cell on the grid, addressed by (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: i32,
    pub col: i32,
}

impl CellIndex {
    pub const fn new(row: i32, col: i32) -> Self {
        CellIndex { row, col }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: &CellIndex) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// The four orthogonal neighbours, in the order up, down, left, right.
    /// Bounds are not checked.
    pub fn neighbors_4(&self) -> [CellIndex; 4] {
        [
            CellIndex::new(self.row - 1, self.col),
            CellIndex::new(self.row + 1, self.col),
            CellIndex::new(self.row, self.col - 1),
            CellIndex::new(self.row, self.col + 1),
        ]
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A point in world space, emitted as a tile centre in resolved paths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
}

impl Waypoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Waypoint { x, y }
    }
}

impl Grid {
    /// Map a world-space point to the cell containing it
    pub fn world_to_cell(&self, x: f32, y: f32) -> SearchResult<CellIndex> {
        let out_of_bounds = || SearchError::OutOfBounds(Location::World { x, y });

        let col = (x / self.tile_width()).floor();
        let row = (y / self.tile_height()).floor();
        // NaN and infinities never compare inside the range
        if !(row >= 0.0 && row < self.rows() as f32 && col >= 0.0 && col < self.cols() as f32) {
            return Err(out_of_bounds());
        }

        let cell = CellIndex::new(row as i32, col as i32);
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(out_of_bounds())
        }
    }

    /// World-space centre of `cell`'s tile
    pub fn cell_to_center(&self, cell: CellIndex) -> Waypoint {
        let tw = self.tile_width();
        let th = self.tile_height();
        Waypoint::new(
            cell.col as f32 * tw + tw / 2.0,
            cell.row as f32 * th + th / 2.0,
        )
    }
}
