use crate::coords::CellIndex;
use crate::error::{Location, MapLoadError, SearchError, SearchResult};

/// Layout character for a wall cell
pub const WALL_CHAR: char = '#';
/// Layout character for a walkable cell
pub const FLOOR_CHAR: char = '.';

/// Static tile grid: dimensions, tile size and row-major wall flags.
///
/// Built once from a map descriptor and never mutated afterwards, so a single
/// `Grid` can be shared by reference across any number of path queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: i32,
    cols: i32,
    tile_width: f32,
    tile_height: f32,
    walls: Vec<bool>,
}

impl Grid {
    /// Create a grid from row-major wall flags
    pub fn new(
        rows: i32,
        cols: i32,
        tile_width: f32,
        tile_height: f32,
        walls: Vec<bool>,
    ) -> SearchResult<Self> {
        if rows <= 0 || cols <= 0 {
            return Err(SearchError::MapInconsistency(format!(
                "grid dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        if !(tile_width.is_finite() && tile_width > 0.0)
            || !(tile_height.is_finite() && tile_height > 0.0)
        {
            return Err(SearchError::MapInconsistency(format!(
                "tile size must be positive, got {}x{}",
                tile_width, tile_height
            )));
        }

        let expected = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or_else(|| SearchError::MapInconsistency("grid too large".to_string()))?;
        if walls.len() != expected {
            return Err(SearchError::MapInconsistency(format!(
                "expected {} wall flags for a {}x{} grid, got {}",
                expected,
                rows,
                cols,
                walls.len()
            )));
        }

        Ok(Grid {
            rows,
            cols,
            tile_width,
            tile_height,
            walls,
        })
    }

    /// Create a grid with every cell walkable
    pub fn open(rows: i32, cols: i32, tile_width: f32, tile_height: f32) -> SearchResult<Self> {
        let len = (rows.max(0) as usize).saturating_mul(cols.max(0) as usize);
        Self::new(rows, cols, tile_width, tile_height, vec![false; len])
    }

    /// Parse an ASCII layout, one string per row (`#` = wall, `.` = floor)
    pub fn from_layout<S: AsRef<str>>(
        lines: &[S],
        tile_width: f32,
        tile_height: f32,
    ) -> Result<Self, MapLoadError> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.as_ref().chars().count()).unwrap_or(0);
        let mut walls = Vec::with_capacity(rows * cols);

        for (row, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != cols {
                return Err(SearchError::MapInconsistency(format!(
                    "layout row {} has {} cells, expected {}",
                    row, width, cols
                ))
                .into());
            }
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    WALL_CHAR => walls.push(true),
                    FLOOR_CHAR => walls.push(false),
                    found => return Err(MapLoadError::Layout { row, col, found }),
                }
            }
        }

        let rows = i32::try_from(rows)
            .map_err(|_| SearchError::MapInconsistency("layout has too many rows".to_string()))?;
        let cols = i32::try_from(cols)
            .map_err(|_| SearchError::MapInconsistency("layout has too many columns".to_string()))?;
        Ok(Self::new(rows, cols, tile_width, tile_height, walls)?)
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// Number of cells (rows * cols)
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Row-major wall flags
    pub fn walls(&self) -> &[bool] {
        &self.walls
    }

    /// Check whether the cell at (row, col) is a wall
    pub fn is_wall(&self, row: i32, col: i32) -> SearchResult<bool> {
        self.is_wall_cell(CellIndex::new(row, col))
    }

    /// Check whether `cell` is a wall
    pub fn is_wall_cell(&self, cell: CellIndex) -> SearchResult<bool> {
        self.index(cell)
            .map(|id| self.walls[id])
            .ok_or(SearchError::OutOfBounds(Location::Cell(cell)))
    }

    /// Check if `cell` lies inside the grid
    pub fn contains(&self, cell: CellIndex) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    /// Convert a cell to its row-major index
    pub fn index(&self, cell: CellIndex) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row as usize * self.cols as usize + cell.col as usize)
        } else {
            None
        }
    }

    /// Convert a row-major index back to a cell
    pub fn cell_at(&self, index: usize) -> CellIndex {
        let cols = self.cols as usize;
        CellIndex::new((index / cols) as i32, (index % cols) as i32)
    }

    /// Render the grid as layout strings, the inverse of [`Grid::from_layout`]
    pub fn to_layout(&self) -> Vec<String> {
        self.walls
            .chunks(self.cols as usize)
            .map(|row| {
                row.iter()
                    .map(|&wall| if wall { WALL_CHAR } else { FLOOR_CHAR })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_flag_count() {
        let err = Grid::new(2, 3, 10.0, 10.0, vec![false; 5]).unwrap_err();
        assert!(matches!(err, SearchError::MapInconsistency(_)));
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        assert!(matches!(
            Grid::new(0, 3, 10.0, 10.0, vec![]),
            Err(SearchError::MapInconsistency(_))
        ));
        assert!(matches!(
            Grid::new(3, -1, 10.0, 10.0, vec![]),
            Err(SearchError::MapInconsistency(_))
        ));
        assert!(matches!(
            Grid::open(2, 2, 0.0, 10.0),
            Err(SearchError::MapInconsistency(_))
        ));
        assert!(matches!(
            Grid::open(2, 2, 10.0, f32::NAN),
            Err(SearchError::MapInconsistency(_))
        ));
    }

    #[test]
    fn test_is_wall_row_major() {
        // 2 rows, 3 cols, wall at (1, 2)
        let grid = Grid::new(2, 3, 10.0, 10.0, vec![false, false, false, false, false, true]).unwrap();
        assert_eq!(grid.is_wall(1, 2), Ok(true));
        assert_eq!(grid.is_wall(0, 2), Ok(false));
        assert_eq!(grid.index(CellIndex::new(1, 2)), Some(5));
        assert_eq!(grid.cell_at(5), CellIndex::new(1, 2));
    }

    #[test]
    fn test_is_wall_out_of_bounds() {
        let grid = Grid::open(2, 2, 10.0, 10.0).unwrap();
        assert_eq!(
            grid.is_wall(2, 0),
            Err(SearchError::OutOfBounds(Location::Cell(CellIndex::new(2, 0))))
        );
        assert!(grid.is_wall(0, -1).is_err());
    }

    #[test]
    fn test_layout_round_trip() {
        let layout = ["..#", "#..", "..."];
        let grid = Grid::from_layout(&layout, 16.0, 16.0).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.is_wall(0, 2), Ok(true));
        assert_eq!(grid.is_wall(1, 0), Ok(true));
        assert_eq!(grid.to_layout(), layout);
    }

    #[test]
    fn test_layout_rejects_ragged_rows() {
        let err = Grid::from_layout(&["...", ".."], 10.0, 10.0).unwrap_err();
        assert!(matches!(err, MapLoadError::Map(SearchError::MapInconsistency(_))));
    }

    #[test]
    fn test_layout_rejects_unknown_char() {
        let err = Grid::from_layout(&["..", ".x"], 10.0, 10.0).unwrap_err();
        assert!(matches!(err, MapLoadError::Layout { row: 1, col: 1, found: 'x' }));
    }

    #[test]
    fn test_layout_rejects_empty() {
        let empty: [&str; 0] = [];
        assert!(Grid::from_layout(&empty, 10.0, 10.0).is_err());
    }
}
