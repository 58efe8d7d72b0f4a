mod common;

use common::{cells_of, is_connected};
use std::path::Path;
use tilechase::config::Config;
use tilechase::{MapDescriptor, PathFinder};

fn repo_file(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(name)
}

#[test]
fn test_bundled_level_loads_and_is_traversable() {
    let descriptor = MapDescriptor::load(repo_file("maps/level1.json")).unwrap();
    let grid = descriptor.to_grid().unwrap();

    let player = descriptor.player.unwrap();
    let pursuer = descriptor.pursuer.unwrap();

    let path = PathFinder::new(&grid)
        .find_path(pursuer.x, pursuer.y, player.x, player.y)
        .unwrap();
    let cells = cells_of(&grid, &path);

    assert_eq!(path.first(), Some(&player));
    assert_eq!(path.last(), Some(&pursuer));
    assert!(is_connected(&cells));
}

#[test]
fn test_bundled_config_parses() {
    let contents = std::fs::read_to_string(repo_file("config.toml")).unwrap();
    let config = Config::from_toml_str(&contents).unwrap();
    assert_eq!(config.map.path, "maps/level1.json");
    assert_eq!(config.search.max_iterations, None);
}

#[test]
fn test_bundled_points_are_reachable() {
    let descriptor = MapDescriptor::load(repo_file("maps/level1.json")).unwrap();
    let grid = descriptor.to_grid().unwrap();
    let player = descriptor.player.unwrap();
    let finder = PathFinder::new(&grid);

    assert!(!descriptor.points.is_empty());
    for point in &descriptor.points {
        let cell = grid.world_to_cell(point.x, point.y).unwrap();
        assert_eq!(grid.is_wall_cell(cell), Ok(false));
        assert!(finder.find_path(player.x, player.y, point.x, point.y).is_ok());
    }
}
