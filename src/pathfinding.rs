use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::coords::{CellIndex, Waypoint};
use crate::error::{Endpoint, EndpointFault, SearchError, SearchResult};
use crate::path::{extract_cells, extract_path};
use crate::Grid;

/// Tuning for a [`PathFinder`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Give up with `Unreachable` once this many cells have been closed.
    /// Values below one behave like one.
    pub max_iterations: Option<usize>,
}

/// A finalized search node. Its position in the [`ClosedSet`] is the
/// backpointer target for every node that points to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedNode {
    pub cell: CellIndex,
    pub g: i32,
    pub h: i32,
    /// Slot of the parent in the closed set; `None` only for the start node
    pub parent: Option<usize>,
}

/// Append-only arena of finalized nodes, with a per-cell lookup
#[derive(Debug, Clone)]
pub struct ClosedSet {
    nodes: Vec<ClosedNode>,
    slot_of: Vec<Option<usize>>,
}

impl ClosedSet {
    fn new(cells: usize) -> Self {
        ClosedSet {
            nodes: Vec::new(),
            slot_of: vec![None; cells],
        }
    }

    /// Append a node and return its slot
    fn push(&mut self, id: usize, node: ClosedNode) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(node);
        self.slot_of[id] = Some(slot);
        slot
    }

    fn contains(&self, id: usize) -> bool {
        self.slot_of[id].is_some()
    }

    pub fn get(&self, slot: usize) -> Option<&ClosedNode> {
        self.nodes.get(slot)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in closing order
    pub fn nodes(&self) -> &[ClosedNode] {
        &self.nodes
    }
}

/// A discovered node that has not been finalized yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    cell: CellIndex,
    g: i32,
    h: i32,
    parent: Option<usize>,
    /// Discovery order, kept when the node is improved
    seq: u64,
}

/// Heap key. Entries go stale when their node is improved or closed.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    f: i32,
    h: i32,
    seq: u64,
    g: i32,
    id: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops lowest f, then lowest h,
        // then earliest discovered
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Outcome of offering a cost to the open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relax {
    Inserted,
    Improved,
    Unchanged,
}

/// The frontier: at most one live node per cell, ordered by (f, h, discovery)
struct OpenSet {
    nodes: Vec<Option<OpenNode>>,
    heap: BinaryHeap<HeapEntry>,
    next_seq: u64,
}

impl OpenSet {
    fn new(cells: usize) -> Self {
        OpenSet {
            nodes: vec![None; cells],
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Insert a newly discovered cell, or lower the cost of an open one.
    /// An existing node is left untouched unless `g` is strictly better.
    fn relax(&mut self, id: usize, cell: CellIndex, g: i32, h: i32, parent: Option<usize>) -> Relax {
        match &mut self.nodes[id] {
            Some(node) => {
                if g >= node.g {
                    return Relax::Unchanged;
                }
                node.g = g;
                node.h = h;
                node.parent = parent;
                self.heap.push(HeapEntry {
                    f: g + h,
                    h,
                    seq: node.seq,
                    g,
                    id,
                });
                Relax::Improved
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.nodes[id] = Some(OpenNode {
                    cell,
                    g,
                    h,
                    parent,
                    seq,
                });
                self.heap.push(HeapEntry {
                    f: g + h,
                    h,
                    seq,
                    g,
                    id,
                });
                Relax::Inserted
            }
        }
    }

    /// Remove and return the best open node
    fn pop_best(&mut self) -> Option<(usize, OpenNode)> {
        while let Some(entry) = self.heap.pop() {
            let live = matches!(self.nodes[entry.id], Some(node) if node.g == entry.g);
            if !live {
                continue;
            }
            if let Some(node) = self.nodes[entry.id].take() {
                return Some((entry.id, node));
            }
        }
        None
    }
}

/// Runs 4-connected A* queries against a shared, read-only [`Grid`].
///
/// Every query builds its own open and closed sets, so a `PathFinder` holds
/// no state between calls and can be used from several agents in a tick.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    grid: &'a Grid,
    options: SearchOptions,
}

impl<'a> PathFinder<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self::with_options(grid, SearchOptions::default())
    }

    pub fn with_options(grid: &'a Grid, options: SearchOptions) -> Self {
        PathFinder { grid, options }
    }

    /// Find a path between two world-space points.
    ///
    /// Returns tile-centre waypoints ordered from the goal back to the start,
    /// both included.
    pub fn find_path(
        &self,
        start_x: f32,
        start_y: f32,
        goal_x: f32,
        goal_y: f32,
    ) -> SearchResult<Vec<Waypoint>> {
        let start = self.resolve_world(Endpoint::Start, start_x, start_y)?;
        let goal = self.resolve_world(Endpoint::Goal, goal_x, goal_y)?;

        let (closed, goal_slot) = self.search(start, goal)?;
        Ok(extract_path(self.grid, &closed, goal_slot))
    }

    /// Find a path between two cells, ordered from the goal back to the start
    pub fn find_cells(&self, start: CellIndex, goal: CellIndex) -> SearchResult<Vec<CellIndex>> {
        self.check_cell(Endpoint::Start, start)?;
        self.check_cell(Endpoint::Goal, goal)?;

        let (closed, goal_slot) = self.search(start, goal)?;
        Ok(extract_cells(&closed, goal_slot))
    }

    fn resolve_world(&self, endpoint: Endpoint, x: f32, y: f32) -> SearchResult<CellIndex> {
        let cell = self
            .grid
            .world_to_cell(x, y)
            .map_err(|_| SearchError::InvalidEndpoint {
                endpoint,
                fault: EndpointFault::OutOfBounds,
            })?;
        self.check_cell(endpoint, cell)?;
        Ok(cell)
    }

    fn check_cell(&self, endpoint: Endpoint, cell: CellIndex) -> SearchResult<()> {
        match self.grid.is_wall_cell(cell) {
            Ok(false) => Ok(()),
            Ok(true) => Err(SearchError::InvalidEndpoint {
                endpoint,
                fault: EndpointFault::Wall,
            }),
            Err(_) => Err(SearchError::InvalidEndpoint {
                endpoint,
                fault: EndpointFault::OutOfBounds,
            }),
        }
    }

    /// Run the search between two validated cells and return the closed set
    /// together with the goal's slot in it.
    fn search(&self, start: CellIndex, goal: CellIndex) -> SearchResult<(ClosedSet, usize)> {
        let walls = self.grid.walls();
        let mut open = OpenSet::new(self.grid.len());
        let mut closed = ClosedSet::new(self.grid.len());

        debug!("[find_path] START: {} -> {}", start, goal);

        let start_id = self
            .grid
            .index(start)
            .ok_or(SearchError::InvalidEndpoint {
                endpoint: Endpoint::Start,
                fault: EndpointFault::OutOfBounds,
            })?;
        open.relax(start_id, start, 0, start.manhattan(&goal), None);

        while let Some((id, current)) = open.pop_best() {
            if let Some(limit) = self.options.max_iterations {
                // The start node is always closed, so a zero budget still
                // answers same-cell queries
                if closed.len() >= limit.max(1) {
                    debug!("[find_path] iteration budget of {} exhausted", limit);
                    return Err(SearchError::Unreachable {
                        explored: closed.len(),
                    });
                }
            }

            let slot = closed.push(
                id,
                ClosedNode {
                    cell: current.cell,
                    g: current.g,
                    h: current.h,
                    parent: current.parent,
                },
            );
            trace!(
                "[A*] close #{} {} g={} h={} f={}",
                slot,
                current.cell,
                current.g,
                current.h,
                current.g + current.h
            );

            if current.cell == goal {
                debug!(
                    "[find_path] FOUND: {} steps, {} cells closed",
                    current.g,
                    closed.len()
                );
                return Ok((closed, slot));
            }

            let g = current.g + 1;
            for neighbor in current.cell.neighbors_4() {
                let Some(nid) = self.grid.index(neighbor) else {
                    continue;
                };
                if walls[nid] || closed.contains(nid) {
                    continue;
                }
                let relaxed = open.relax(nid, neighbor, g, neighbor.manhattan(&goal), Some(slot));
                if relaxed == Relax::Improved {
                    trace!("[A*] improved {} to g={}", neighbor, g);
                }
            }
        }

        debug!("[find_path] NO PATH after closing {} cells", closed.len());
        Err(SearchError::Unreachable {
            explored: closed.len(),
        })
    }
}

/// Find a path between two world-space points with default options
pub fn find_path(
    grid: &Grid,
    start_x: f32,
    start_y: f32,
    goal_x: f32,
    goal_y: f32,
) -> SearchResult<Vec<Waypoint>> {
    PathFinder::new(grid).find_path(start_x, start_y, goal_x, goal_y)
}
