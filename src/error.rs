use std::fmt;

use thiserror::Error;

use crate::coords::CellIndex;

/// Which end of a query was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

/// Why an endpoint was rejected before the search started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFault {
    OutOfBounds,
    Wall,
}

/// Where an out-of-bounds access happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    Cell(CellIndex),
    World { x: f32, y: f32 },
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

impl fmt::Display for EndpointFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointFault::OutOfBounds => write!(f, "outside the grid"),
            EndpointFault::Wall => write!(f, "on a wall cell"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Cell(cell) => write!(f, "cell {}", cell),
            Location::World { x, y } => write!(f, "world point ({}, {})", x, y),
        }
    }
}

/// Errors raised by grid construction and path queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("Map inconsistency: {0}")]
    MapInconsistency(String),

    #[error("{0} is outside the grid")]
    OutOfBounds(Location),

    #[error("Invalid {endpoint} endpoint: {fault}")]
    InvalidEndpoint {
        endpoint: Endpoint,
        fault: EndpointFault,
    },

    #[error("Goal unreachable after closing {explored} cells")]
    Unreachable { explored: usize },
}

/// Result type for grid and search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors raised while reading a map descriptor from disk
#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("Failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse map descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid layout at row {row}, column {col}: unexpected '{found}'")]
    Layout { row: usize, col: usize, found: char },

    #[error(transparent)]
    Map(#[from] SearchError),
}
