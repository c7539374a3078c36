use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::engine::AnimationTiming;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration. Every section and field is optional in the TOML
/// file and falls back to the values the games ship with.
///
/// ```
/// use arcade_grid::config::ArcadeConfig;
/// let cfg: ArcadeConfig = toml::from_str("[snake]\nbase_interval_ms = 120\n").unwrap();
/// assert_eq!(cfg.snake.base_interval_ms, 120);
/// assert_eq!(cfg.twenty48.win_tile, 2048);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Default)]
pub struct ArcadeConfig {
    #[serde(default)]
    pub twenty48: Twenty48Config,
    #[serde(default)]
    pub snake: SnakeConfig,
    #[serde(default)]
    pub scores: ScoresConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Twenty48Config {
    /// Probability that a spawned tile is a 4.
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,
    /// Tile value that triggers the win notification.
    #[serde(default = "defaults::win_tile")]
    pub win_tile: u32,
    #[serde(default = "defaults::slide_ms")]
    pub slide_ms: u64,
    #[serde(default = "defaults::settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "defaults::settle_idle_ms")]
    pub settle_idle_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SnakeConfig {
    #[serde(default = "defaults::board_size")]
    pub width: i32,
    #[serde(default = "defaults::board_size")]
    pub height: i32,
    /// Tick period at speed modifier 1.0.
    #[serde(default = "defaults::base_interval_ms")]
    pub base_interval_ms: u64,
    #[serde(default = "defaults::min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "defaults::max_interval_ms")]
    pub max_interval_ms: u64,
    #[serde(default = "defaults::points_per_food")]
    pub points_per_food: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScoresConfig {
    /// Entries kept per high-score list.
    #[serde(default = "defaults::capacity")]
    pub capacity: usize,
    /// JSON blob holding every list. `None` keeps scores in memory only.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for Twenty48Config {
    fn default() -> Self {
        Self {
            four_probability: defaults::four_probability(),
            win_tile: defaults::win_tile(),
            slide_ms: defaults::slide_ms(),
            settle_ms: defaults::settle_ms(),
            settle_idle_ms: defaults::settle_idle_ms(),
        }
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            width: defaults::board_size(),
            height: defaults::board_size(),
            base_interval_ms: defaults::base_interval_ms(),
            min_interval_ms: defaults::min_interval_ms(),
            max_interval_ms: defaults::max_interval_ms(),
            points_per_food: defaults::points_per_food(),
        }
    }
}

impl Default for ScoresConfig {
    fn default() -> Self {
        Self { capacity: defaults::capacity(), path: None }
    }
}

impl Twenty48Config {
    pub fn timing(&self) -> AnimationTiming {
        AnimationTiming {
            slide: Duration::from_millis(self.slide_ms),
            settle: Duration::from_millis(self.settle_ms),
            settle_idle: Duration::from_millis(self.settle_idle_ms),
        }
    }
}

impl SnakeConfig {
    pub fn base_interval(&self) -> Duration {
        Duration::from_millis(self.base_interval_ms)
    }
}

impl ArcadeConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.twenty48;
        if !(0.0..=1.0).contains(&t.four_probability) {
            return Err(ConfigError::Invalid(format!(
                "twenty48.four_probability must be in [0, 1], got {}",
                t.four_probability
            )));
        }
        if t.win_tile < 4 || !t.win_tile.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "twenty48.win_tile must be a power of two >= 4, got {}",
                t.win_tile
            )));
        }
        let s = &self.snake;
        // The snake spawns three cells tall around the centre.
        if s.width < 3 || s.height < 5 {
            return Err(ConfigError::Invalid(format!(
                "snake board must be at least 3x5, got {}x{}",
                s.width, s.height
            )));
        }
        if s.min_interval_ms == 0 || s.min_interval_ms > s.max_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "snake interval bounds must satisfy 0 < min <= max, got {}..{}",
                s.min_interval_ms, s.max_interval_ms
            )));
        }
        if self.scores.capacity == 0 {
            return Err(ConfigError::Invalid("scores.capacity must be positive".into()));
        }
        Ok(())
    }
}

mod defaults {
    pub fn four_probability() -> f64 { 0.1 }
    pub fn win_tile() -> u32 { 2048 }
    pub fn slide_ms() -> u64 { 150 }
    pub fn settle_ms() -> u64 { 200 }
    pub fn settle_idle_ms() -> u64 { 50 }
    pub fn board_size() -> i32 { 20 }
    pub fn base_interval_ms() -> u64 { 150 }
    pub fn min_interval_ms() -> u64 { 50 }
    pub fn max_interval_ms() -> u64 { 300 }
    pub fn points_per_food() -> u64 { 10 }
    pub fn capacity() -> usize { 10 }
}
