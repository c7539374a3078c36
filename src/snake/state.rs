use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::Move;

/// A board coordinate; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The neighbouring cell in `dir`, unbounded.
    #[inline]
    pub fn step(self, dir: Move) -> Cell {
        let (dx, dy) = dir.delta();
        Cell { x: self.x + dx, y: self.y + dy }
    }

    #[inline]
    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }

    /// Wrap onto a `width` x `height` torus.
    #[inline]
    pub fn wrapped(self, width: i32, height: i32) -> Cell {
        Cell { x: self.x.rem_euclid(width), y: self.y.rem_euclid(height) }
    }
}

/// Rule set chosen at mode-select time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Walls and self-collision end the game.
    Classic,
    /// The board wraps and the snake passes through itself. Not scored.
    Zen,
    /// Classic rules plus special food with timed or instant effects.
    PowerUp,
}

impl Mode {
    #[inline]
    pub fn has_walls(self) -> bool {
        !matches!(self, Mode::Zen)
    }

    /// High-score list for this mode, if the mode is scored.
    pub fn score_key(self) -> Option<&'static str> {
        match self {
            Mode::Classic => Some("snake.classic"),
            Mode::Zen => None,
            Mode::PowerUp => Some("snake.powerup"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Classic => "classic",
            Mode::Zen => "zen",
            Mode::PowerUp => "powerup",
        };
        f.write_str(s)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Mode::Classic),
            "zen" => Ok(Mode::Zen),
            "powerup" | "power-up" => Ok(Mode::PowerUp),
            other => Err(format!("unknown snake mode '{other}' (expected classic, zen or powerup)")),
        }
    }
}

/// Lifecycle of a snake round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the first direction.
    Idle,
    Running,
    Paused,
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_crosses_every_edge() {
        assert_eq!(Cell::new(-1, 5).wrapped(20, 20), Cell::new(19, 5));
        assert_eq!(Cell::new(20, 5).wrapped(20, 20), Cell::new(0, 5));
        assert_eq!(Cell::new(3, -1).wrapped(20, 20), Cell::new(3, 19));
        assert_eq!(Cell::new(3, 20).wrapped(20, 20), Cell::new(3, 0));
    }

    #[test]
    fn step_and_bounds() {
        let c = Cell::new(0, 0);
        assert_eq!(c.step(Move::Up), Cell::new(0, -1));
        assert!(!c.step(Move::Left).in_bounds(20, 20));
        assert!(c.step(Move::Right).in_bounds(20, 20));
    }

    #[test]
    fn mode_parsing_and_keys() {
        assert_eq!("Zen".parse::<Mode>(), Ok(Mode::Zen));
        assert_eq!("power-up".parse::<Mode>(), Ok(Mode::PowerUp));
        assert!("arcade".parse::<Mode>().is_err());
        assert_eq!(Mode::Zen.score_key(), None);
        assert_ne!(Mode::Classic.score_key(), Mode::PowerUp.score_key());
    }
}
