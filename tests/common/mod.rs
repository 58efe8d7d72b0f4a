#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tilechase::{CellIndex, Grid, Waypoint};

pub const TILE: f32 = 10.0;

/// Build a grid from layout rows with square tiles of size TILE
pub fn grid_from(layout: &[&str]) -> Grid {
    Grid::from_layout(layout, TILE, TILE).unwrap()
}

/// World-space centre of a cell on a TILE-sized grid
pub fn center(row: i32, col: i32) -> (f32, f32) {
    (col as f32 * TILE + TILE / 2.0, row as f32 * TILE + TILE / 2.0)
}

/// Resolve every waypoint back to its cell
pub fn cells_of(grid: &Grid, path: &[Waypoint]) -> Vec<CellIndex> {
    path.iter()
        .map(|p| grid.world_to_cell(p.x, p.y).unwrap())
        .collect()
}

/// Check that consecutive cells are orthogonal neighbours
pub fn is_connected(cells: &[CellIndex]) -> bool {
    cells.windows(2).all(|w| w[0].manhattan(&w[1]) == 1)
}

/// Shortest step count between two cells, by breadth-first search
pub fn bfs_distance(grid: &Grid, start: CellIndex, goal: CellIndex) -> Option<i32> {
    let mut dist = vec![-1; grid.len()];
    let mut queue = VecDeque::new();
    dist[grid.index(start)?] = 0;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let d = dist[grid.index(cell)?];
        if cell == goal {
            return Some(d);
        }
        for n in cell.neighbors_4() {
            if let Some(id) = grid.index(n) {
                if !grid.walls()[id] && dist[id] < 0 {
                    dist[id] = d + 1;
                    queue.push_back(n);
                }
            }
        }
    }
    None
}

/// Straightforward A* with a linear scan over an unsorted open list.
/// Picks the lowest f, then the lowest h, keeping the first found on ties.
pub fn reference_astar(grid: &Grid, start: CellIndex, goal: CellIndex) -> Option<Vec<CellIndex>> {
    struct Node {
        cell: CellIndex,
        g: i32,
        h: i32,
        parent: Option<usize>,
    }

    let mut open = vec![Node {
        cell: start,
        g: 0,
        h: start.manhattan(&goal),
        parent: None,
    }];
    let mut closed: Vec<Node> = Vec::new();

    while !open.is_empty() {
        let mut best = 0;
        for i in 1..open.len() {
            let (a, b) = (&open[i], &open[best]);
            if a.g + a.h < b.g + b.h || (a.g + a.h == b.g + b.h && a.h < b.h) {
                best = i;
            }
        }
        let node = open.remove(best);
        let (cell, g) = (node.cell, node.g);
        closed.push(node);
        let slot = closed.len() - 1;

        if cell == goal {
            let mut cells = Vec::new();
            let mut next = Some(slot);
            while let Some(i) = next {
                cells.push(closed[i].cell);
                next = closed[i].parent;
            }
            return Some(cells);
        }

        for n in cell.neighbors_4() {
            if !grid.contains(n) || grid.is_wall_cell(n).unwrap() {
                continue;
            }
            if closed.iter().any(|c| c.cell == n) {
                continue;
            }
            let h = n.manhattan(&goal);
            match open.iter_mut().find(|o| o.cell == n) {
                Some(o) => {
                    if g + 1 < o.g {
                        o.g = g + 1;
                        o.h = h;
                        o.parent = Some(slot);
                    }
                }
                None => open.push(Node {
                    cell: n,
                    g: g + 1,
                    h,
                    parent: Some(slot),
                }),
            }
        }
    }
    None
}

/// Seeded generator so map tests are reproducible
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random grid with roughly `wall_percent`% wall cells
pub fn random_grid(rows: i32, cols: i32, wall_percent: u32, seed: u64) -> Grid {
    let mut rng = seeded(seed);
    let walls = (0..rows * cols)
        .map(|_| rng.gen_range(0..100) < wall_percent)
        .collect();
    Grid::new(rows, cols, TILE, TILE, walls).unwrap()
}

/// Pick a random walkable cell
pub fn random_free_cell(grid: &Grid, rng: &mut StdRng) -> Option<CellIndex> {
    let free: Vec<usize> = (0..grid.len()).filter(|&id| !grid.walls()[id]).collect();
    if free.is_empty() {
        return None;
    }
    let id = free[rng.gen_range(0..free.len())];
    Some(grid.cell_at(id))
}
