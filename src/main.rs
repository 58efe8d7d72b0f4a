use arboard::Clipboard;
use macroquad::prelude::*;
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use tilechase::config::Config;
use tilechase::path::{format_path, render_path};
use tilechase::{
    CellIndex, Grid, MapDescriptor, MapLoadError, PathFinder, Pursuer, SearchOptions, Waypoint,
};

/// Fallback level used when the configured map cannot be loaded
const DEFAULT_LAYOUT: [&str; 12] = [
    "################",
    "#..............#",
    "#.####.##.####.#",
    "#.#..........#.#",
    "#.#.##.##.##.#.#",
    "#......#.......#",
    "#.####.#.####..#",
    "#.#..........#.#",
    "#.#.####.###.#.#",
    "#..............#",
    "#.####.##.####.#",
    "################",
];
const DEFAULT_TILE_SIZE: f32 = 40.0;

static CONFIG: OnceLock<Config> = OnceLock::new();

fn config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}

/// The player-controlled target
struct Player {
    fpos_x: f32,
    fpos_y: f32,
    size: f32,
    speed: f32,
}

/// Demo state
struct GameState {
    grid: Grid,
    options: SearchOptions,
    player: Player,
    pursuer: Pursuer,
    player_spawn: Waypoint,
    pursuer_spawn: Waypoint,
    /// Points still on the map, and the full set to restore once all are taken
    points: Vec<Waypoint>,
    level_points: Vec<Waypoint>,
    status: String,
    catches: u32,
    collected: u32,
}

impl GameState {
    fn new(config: &Config) -> Result<Self, MapLoadError> {
        let (grid, descriptor) = load_level(config)?;

        let player_spawn = descriptor
            .as_ref()
            .and_then(|d| d.player)
            .or_else(|| free_cell_center(&grid, false))
            .unwrap_or(Waypoint::new(0.0, 0.0));
        let pursuer_spawn = descriptor
            .as_ref()
            .and_then(|d| d.pursuer)
            .or_else(|| free_cell_center(&grid, true))
            .unwrap_or(Waypoint::new(0.0, 0.0));

        let level_points = descriptor
            .as_ref()
            .map(|d| d.points.clone())
            .unwrap_or_default();

        let tile = grid.tile_width().min(grid.tile_height());
        let player = Player {
            fpos_x: player_spawn.x,
            fpos_y: player_spawn.y,
            size: tile * config.player.size_ratio,
            speed: config.player.speed,
        };
        let pursuer = Pursuer::new(
            pursuer_spawn.x,
            pursuer_spawn.y,
            tile * config.pursuer.size_ratio,
            config.pursuer.speed,
        );

        Ok(GameState {
            grid,
            options: config.search.options(),
            player,
            pursuer,
            player_spawn,
            pursuer_spawn,
            points: level_points.clone(),
            level_points,
            status: String::new(),
            catches: 0,
            collected: 0,
        })
    }

    fn handle_input(&mut self, delta_time: f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if is_key_down(KeyCode::Up) || is_key_down(KeyCode::W) {
            dy -= 1.0;
        } else if is_key_down(KeyCode::Down) || is_key_down(KeyCode::S) {
            dy += 1.0;
        } else if is_key_down(KeyCode::Left) || is_key_down(KeyCode::A) {
            dx -= 1.0;
        } else if is_key_down(KeyCode::Right) || is_key_down(KeyCode::D) {
            dx += 1.0;
        }

        let step = self.player.speed * delta_time;
        let next_x = self.player.fpos_x + dx * step;
        let next_y = self.player.fpos_y + dy * step;
        if !self.blocked(next_x, next_y, self.player.size) {
            self.player.fpos_x = next_x;
            self.player.fpos_y = next_y;
        }
    }

    /// Whether a square of `size` centred on (x, y) touches a wall or leaves the map
    fn blocked(&self, x: f32, y: f32, size: f32) -> bool {
        let half = size / 2.0;
        [
            (x - half, y - half),
            (x + half, y - half),
            (x - half, y + half),
            (x + half, y + half),
        ]
        .iter()
        .any(|&(cx, cy)| match self.grid.world_to_cell(cx, cy) {
            Ok(cell) => self.grid.is_wall_cell(cell).unwrap_or(true),
            Err(_) => true,
        })
    }

    /// Remove every point the player's square overlaps
    fn collect_points(&mut self) {
        let (x, y) = (self.player.fpos_x, self.player.fpos_y);
        let reach = (self.player.size + self.point_size()) / 2.0;
        let before = self.points.len();
        self.points.retain(|p| (p.x - x).abs() > reach || (p.y - y).abs() > reach);

        let taken = before - self.points.len();
        if taken > 0 {
            self.collected += taken as u32;
            debug!("Collected {} point(s), {} left", taken, self.points.len());
            if self.points.is_empty() {
                info!("All points collected ({} in total)", self.collected);
                self.points = self.level_points.clone();
            }
        }
    }

    fn point_size(&self) -> f32 {
        self.grid.tile_width().min(self.grid.tile_height()) * 0.25
    }

    fn update(&mut self, delta_time: f32) {
        let finder = PathFinder::with_options(&self.grid, self.options);
        match self
            .pursuer
            .tick(&finder, self.player.fpos_x, self.player.fpos_y, delta_time)
        {
            Ok(true) => {
                self.catches += 1;
                info!("Caught the player ({} so far)", self.catches);
                self.respawn();
            }
            Ok(false) => {
                debug!("Pursuer path: {}", format_path(self.pursuer.path()));
                self.status = format!("Path: {} waypoints", self.pursuer.path().len());
            }
            Err(e) => {
                debug!("No path this tick: {}", e);
                self.status = e.to_string();
            }
        }
    }

    fn respawn(&mut self) {
        self.player.fpos_x = self.player_spawn.x;
        self.player.fpos_y = self.player_spawn.y;
        self.pursuer = Pursuer::new(
            self.pursuer_spawn.x,
            self.pursuer_spawn.y,
            self.pursuer.size,
            self.pursuer.speed,
        );
    }

    fn path_cells(&self) -> Vec<CellIndex> {
        self.pursuer
            .path()
            .iter()
            .filter_map(|p| self.grid.world_to_cell(p.x, p.y).ok())
            .collect()
    }

    fn copy_to_clipboard(&self) {
        let map_string = render_path(&self.grid, &self.path_cells());
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(map_string) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Map and path copied to clipboard");
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn draw(&self, config: &Config) {
        let visual = &config.visual;
        clear_background(Color::from_rgba(
            visual.background_r,
            visual.background_g,
            visual.background_b,
            255,
        ));

        let tw = self.grid.tile_width();
        let th = self.grid.tile_height();
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let wall = self.grid.is_wall(row, col).unwrap_or(true);
                let color = if wall {
                    Color::from_rgba(visual.wall_r, visual.wall_g, visual.wall_b, 255)
                } else {
                    Color::from_rgba(visual.floor_r, visual.floor_g, visual.floor_b, 255)
                };
                draw_rectangle(col as f32 * tw, row as f32 * th, tw - 1.0, th - 1.0, color);
            }
        }

        if visual.show_path {
            for p in self.pursuer.path() {
                draw_circle(p.x, p.y, tw.min(th) * 0.12, Color::from_rgba(100, 200, 100, 255));
            }
        }

        for p in &self.points {
            draw_circle(p.x, p.y, self.point_size() / 2.0, GOLD);
        }

        let (left, top, right, bottom) = self.pursuer.get_bounds();
        draw_rectangle(left, top, right - left, bottom - top, RED);

        let half = self.player.size / 2.0;
        draw_rectangle(
            self.player.fpos_x - half,
            self.player.fpos_y - half,
            self.player.size,
            self.player.size,
            YELLOW,
        );

        let info = format!(
            "{} | Catches: {} | Points: {} | Arrows/WASD: move | C: copy map | Esc: close",
            self.status, self.catches, self.collected
        );
        draw_text(&info, 10.0, screen_height() - 10.0, 20.0, WHITE);
    }
}

/// Load the configured map, falling back to the built-in layout
fn load_level(config: &Config) -> Result<(Grid, Option<MapDescriptor>), MapLoadError> {
    let loaded = MapDescriptor::load(&config.map.path)
        .and_then(|descriptor| descriptor.to_grid().map(|grid| (grid, descriptor)));
    match loaded {
        Ok((grid, descriptor)) => Ok((grid, Some(descriptor))),
        Err(e) => {
            warn!("Failed to load {}: {}", config.map.path, e);
            warn!("Using built-in level");
            let grid = Grid::from_layout(&DEFAULT_LAYOUT, DEFAULT_TILE_SIZE, DEFAULT_TILE_SIZE)?;
            Ok((grid, None))
        }
    }
}

/// Centre of the first (or last) walkable cell in row-major order
fn free_cell_center(grid: &Grid, last: bool) -> Option<Waypoint> {
    let mut free = (0..grid.len()).filter(|&id| !grid.walls()[id]);
    let id = if last { free.last() } else { free.next() }?;
    Some(grid.cell_to_center(grid.cell_at(id)))
}

fn window_conf() -> Conf {
    Conf {
        window_title: config().visual.window_title.clone(),
        window_width: 640,
        window_height: 520,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = config();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    let mut state = match GameState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("Cannot start: {}", e);
            return;
        }
    };

    loop {
        let delta_time = get_frame_time();

        state.handle_input(delta_time);
        state.collect_points();
        state.update(delta_time);

        // Copy map and current path to clipboard on C key
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.draw(config);

        next_frame().await
    }
}
