use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tracing::info;

use crate::coords::Waypoint;
use crate::error::{MapLoadError, SearchError};
use crate::Grid;

/// Level description as stored on disk (JSON).
///
/// Walls come either as a row-major `walls` array, which needs `rows` and
/// `cols`, or as `layout` strings (`#` wall, `.` floor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDescriptor {
    #[serde(default)]
    pub rows: Option<i32>,
    #[serde(default)]
    pub cols: Option<i32>,
    pub tile_width: f32,
    pub tile_height: f32,
    #[serde(default)]
    pub walls: Option<Vec<bool>>,
    #[serde(default)]
    pub layout: Option<Vec<String>>,
    /// Player spawn point in world coordinates
    #[serde(default)]
    pub player: Option<Waypoint>,
    /// Pursuer spawn point in world coordinates
    #[serde(default)]
    pub pursuer: Option<Waypoint>,
    /// Collectible points in world coordinates
    #[serde(default)]
    pub points: Vec<Waypoint>,
}

impl MapDescriptor {
    pub fn from_json_str(json: &str) -> Result<Self, MapLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a descriptor from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapLoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let descriptor = Self::from_json_str(&json)?;
        info!("Loaded map descriptor from {}", path.display());
        Ok(descriptor)
    }

    /// Build the grid this descriptor describes
    pub fn to_grid(&self) -> Result<Grid, MapLoadError> {
        let grid = match (&self.walls, &self.layout) {
            (Some(walls), None) => {
                let (Some(rows), Some(cols)) = (self.rows, self.cols) else {
                    return Err(inconsistent("a walls array needs rows and cols"));
                };
                Grid::new(rows, cols, self.tile_width, self.tile_height, walls.clone())?
            }
            (None, Some(layout)) => {
                let grid = Grid::from_layout(layout.as_slice(), self.tile_width, self.tile_height)?;
                if self.rows.is_some_and(|r| r != grid.rows())
                    || self.cols.is_some_and(|c| c != grid.cols())
                {
                    return Err(inconsistent("layout size does not match rows/cols"));
                }
                grid
            }
            (Some(_), Some(_)) => return Err(inconsistent("give either walls or layout, not both")),
            (None, None) => return Err(inconsistent("no walls or layout given")),
        };

        info!(
            "Map is {}x{} cells of {}x{}",
            grid.rows(),
            grid.cols(),
            grid.tile_width(),
            grid.tile_height()
        );
        Ok(grid)
    }
}

fn inconsistent(reason: &str) -> MapLoadError {
    SearchError::MapInconsistency(reason.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walls_descriptor() {
        let json = r#"{
            "rows": 2, "cols": 2, "tile_width": 32.0, "tile_height": 32.0,
            "walls": [false, true, false, false],
            "player": { "x": 16.0, "y": 48.0 }
        }"#;
        let descriptor = MapDescriptor::from_json_str(json).unwrap();
        let grid = descriptor.to_grid().unwrap();
        assert_eq!(grid.is_wall(0, 1), Ok(true));
        assert_eq!(grid.is_wall(1, 1), Ok(false));
        assert_eq!(descriptor.player, Some(Waypoint::new(16.0, 48.0)));
        assert_eq!(descriptor.pursuer, None);
        assert!(descriptor.points.is_empty());
    }

    #[test]
    fn test_points() {
        let json = r#"{
            "tile_width": 10.0, "tile_height": 10.0,
            "layout": ["...", "..."],
            "points": [{ "x": 5.0, "y": 5.0 }, { "x": 25.0, "y": 15.0 }]
        }"#;
        let descriptor = MapDescriptor::from_json_str(json).unwrap();
        assert_eq!(
            descriptor.points,
            vec![Waypoint::new(5.0, 5.0), Waypoint::new(25.0, 15.0)]
        );
    }

    #[test]
    fn test_walls_need_dimensions() {
        let json = r#"{
            "rows": 2, "tile_width": 10.0, "tile_height": 10.0,
            "walls": [false, false, false, false]
        }"#;
        let err = MapDescriptor::from_json_str(json).unwrap().to_grid().unwrap_err();
        assert!(matches!(err, MapLoadError::Map(SearchError::MapInconsistency(_))));
    }

    #[test]
    fn test_layout_descriptor() {
        let json = r###"{
            "tile_width": 10.0, "tile_height": 10.0,
            "layout": ["..#", "..."]
        }"###;
        let grid = MapDescriptor::from_json_str(json).unwrap().to_grid().unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.is_wall(0, 2), Ok(true));
    }

    #[test]
    fn test_wrong_flag_count_is_inconsistent() {
        let json = r#"{
            "rows": 2, "cols": 2, "tile_width": 32.0, "tile_height": 32.0,
            "walls": [false, true, false]
        }"#;
        let err = MapDescriptor::from_json_str(json).unwrap().to_grid().unwrap_err();
        assert!(matches!(err, MapLoadError::Map(SearchError::MapInconsistency(_))));
    }

    #[test]
    fn test_layout_size_mismatch() {
        let json = r#"{
            "rows": 3, "tile_width": 10.0, "tile_height": 10.0,
            "layout": ["..", ".."]
        }"#;
        let err = MapDescriptor::from_json_str(json).unwrap().to_grid().unwrap_err();
        assert!(matches!(err, MapLoadError::Map(SearchError::MapInconsistency(_))));
    }

    #[test]
    fn test_needs_exactly_one_wall_source() {
        let neither = r#"{ "rows": 1, "cols": 1, "tile_width": 1.0, "tile_height": 1.0 }"#;
        assert!(MapDescriptor::from_json_str(neither).unwrap().to_grid().is_err());

        let both = r#"{
            "rows": 1, "cols": 1, "tile_width": 1.0, "tile_height": 1.0,
            "walls": [false], "layout": ["."]
        }"#;
        assert!(MapDescriptor::from_json_str(both).unwrap().to_grid().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = MapDescriptor::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, MapLoadError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = MapDescriptor::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, MapLoadError::Io(_)));
    }
}
