use serde::Deserialize;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::pathfinding::SearchOptions;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub pursuer: PursuerConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_path")]
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchConfig {
    /// Cells a single query may close before it reports the goal unreachable
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PursuerConfig {
    #[serde(default = "default_pursuer_speed")]
    pub speed: f32,
    #[serde(default = "default_size_ratio")]
    pub size_ratio: f32,
}

#[derive(Debug, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_speed")]
    pub speed: f32,
    #[serde(default = "default_size_ratio")]
    pub size_ratio: f32,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_wall_r")]
    pub wall_r: u8,
    #[serde(default = "default_wall_g")]
    pub wall_g: u8,
    #[serde(default = "default_wall_b")]
    pub wall_b: u8,
    #[serde(default = "default_floor_r")]
    pub floor_r: u8,
    #[serde(default = "default_floor_g")]
    pub floor_g: u8,
    #[serde(default = "default_floor_b")]
    pub floor_b: u8,
    #[serde(default = "default_show_path")]
    pub show_path: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default values
fn default_map_path() -> String { "maps/level1.json".to_string() }
fn default_pursuer_speed() -> f32 { 90.0 }
fn default_player_speed() -> f32 { 120.0 }
fn default_size_ratio() -> f32 { 0.7 }
fn default_window_title() -> String { "Tilechase - A* Pursuit Demo".to_string() }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_wall_r() -> u8 { 40 }
fn default_wall_g() -> u8 { 60 }
fn default_wall_b() -> u8 { 160 }
fn default_floor_r() -> u8 { 15 }
fn default_floor_g() -> u8 { 15 }
fn default_floor_b() -> u8 { 15 }
fn default_show_path() -> bool { true }
fn default_log_filter() -> String { "info".to_string() }

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            path: default_map_path(),
        }
    }
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            speed: default_pursuer_speed(),
            size_ratio: default_size_ratio(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: default_player_speed(),
            size_ratio: default_size_ratio(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            wall_r: default_wall_r(),
            wall_g: default_wall_g(),
            wall_b: default_wall_b(),
            floor_r: default_floor_r(),
            floor_g: default_floor_g(),
            floor_b: default_floor_b(),
            show_path: default_show_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            max_iterations: self.max_iterations,
        }
    }
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        Self::load_from(CONFIG_PATH)
    }

    /// Load configuration from `path`, falling back to defaults if the file
    /// is missing or cannot be parsed
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }
}
