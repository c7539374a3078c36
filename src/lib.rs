//! arcade-grid: the grid simulations behind a small arcade, 2048 and Snake
//!
//! This crate provides:
//! - A 4x4 `Grid` with the slide/merge pass, tile provenance for animation and
//!   a `Game` session that sequences move, animation delay and tile spawn (`engine`)
//! - A fixed-step Snake engine with classic, zen and power-up rules, plus skins (`snake`)
//! - Capped high-score lists behind a small key-value store trait (`scores`)
//! - TOML configuration (`config`), input normalization (`input`) and scripted
//!   players for headless runs (`autoplay`)
//!
//! Quick start:
//! ```
//! use arcade_grid::config::Twenty48Config;
//! use arcade_grid::engine::{Game, Submit};
//! use arcade_grid::Move;
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::time::Duration;
//!
//! // Deterministic session with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = Game::new(Twenty48Config::default(), &mut rng);
//! let now = Duration::ZERO;
//! if let Submit::Applied(applied) = game.submit(Move::Left, now) {
//!     // the host animates `applied.movements`, then settles
//!     let settled = game.settle(applied.settle_at, &mut rng).unwrap();
//!     assert!(settled.spawned.is_some());
//! }
//! ```
//!
//! Engines never read the clock: the caller passes `now` (2048) or drives
//! `tick` on its own timer (Snake). Randomness always comes from a caller-supplied
//! `rand::Rng`, so seeded runs are reproducible.
pub mod autoplay;
pub mod config;
pub mod engine;
pub mod input;
pub mod scores;
pub mod snake;

pub use engine::Move;
