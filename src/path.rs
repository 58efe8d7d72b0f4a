use crate::coords::{CellIndex, Waypoint};
use crate::grid::{FLOOR_CHAR, WALL_CHAR};
use crate::pathfinding::ClosedSet;
use crate::Grid;

/// Walk parent links from `goal_slot` back to the start node.
/// Cells come out goal first, start last.
pub fn extract_cells(closed: &ClosedSet, goal_slot: usize) -> Vec<CellIndex> {
    let mut cells = Vec::new();
    let mut next = Some(goal_slot);

    while let Some(slot) = next {
        let Some(node) = closed.get(slot) else {
            break;
        };
        cells.push(node.cell);
        // Parents are always closed before their children
        debug_assert!(node.parent.map_or(true, |p| p < slot));
        next = node.parent;
    }

    cells
}

/// Like [`extract_cells`], but emits the world-space centre of each tile
pub fn extract_path(grid: &Grid, closed: &ClosedSet, goal_slot: usize) -> Vec<Waypoint> {
    extract_cells(closed, goal_slot)
        .into_iter()
        .map(|cell| grid.cell_to_center(cell))
        .collect()
}

/// Format path for display
pub fn format_path(path: &[Waypoint]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    let mut result = String::new();
    for (i, p) in path.iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&format!("({},{})", p.x, p.y));
    }
    result
}

/// Draw the grid with a goal-to-start cell path on top.
///
/// `G` marks the goal, `S` the start and `*` the cells in between.
pub fn render_path(grid: &Grid, cells: &[CellIndex]) -> String {
    let mut result = String::new();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = CellIndex::new(row, col);
            let symbol = if cells.first() == Some(&cell) {
                'G'
            } else if cells.last() == Some(&cell) {
                'S'
            } else if cells.contains(&cell) {
                '*'
            } else if grid.is_wall_cell(cell).unwrap_or(true) {
                WALL_CHAR
            } else {
                FLOOR_CHAR
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}
