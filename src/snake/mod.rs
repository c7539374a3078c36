//! Snake engine: a fixed-step simulation on a bounded or wrapping board.
//!
//! The host owns the timer. Call [`SnakeGame::tick`] once per
//! [`SnakeGame::interval`] and feed direction inputs with [`SnakeGame::turn`].

mod food;
mod game;
pub mod skin;
mod speed;
mod state;

pub use food::{free_cell, Food, FoodKind, FAST_POTION, SCISSORS_CUT, SLOW_POTION};
pub use game::{Crash, Input, SnakeGame, Snapshot, Tick};
pub use skin::{Color, Palette, Skin, Theme};
pub use speed::SpeedModifier;
pub use state::{Cell, Mode, Phase};
