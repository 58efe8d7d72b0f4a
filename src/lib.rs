//! Deterministic 4-connected A* over a static tile map, used to steer a
//! pursuing agent toward a target one step per tick.
//!
//! World-space points are mapped to grid cells, searched with a Manhattan
//! heuristic and unit step cost, and the result is returned as tile-centre
//! waypoints ordered from the goal back to the start.

pub mod agent;
pub mod config;
pub mod coords;
pub mod error;
pub mod grid;
pub mod map_loader;
pub mod path;
pub mod pathfinding;

pub use agent::Pursuer;
pub use coords::{CellIndex, Waypoint};
pub use error::{Endpoint, EndpointFault, Location, MapLoadError, SearchError, SearchResult};
pub use grid::Grid;
pub use map_loader::MapDescriptor;
pub use pathfinding::{find_path, PathFinder, SearchOptions};
