//! 2048 engine: the 4x4 grid, the move/merge pass, tile provenance for
//! animation, and the session state machine.
//!
//! - `Grid` is a small `Copy` value with ergonomic methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - `Game` owns a session: score, win/loss flags and the settle timer.

pub mod game;
mod movement;
mod ops;
pub mod state;

pub use game::{AppliedMove, Game, Phase, Rejection, Settled, Snapshot, Submit, SCORE_KEY};
pub use movement::{reconstruct, AnimationTiming, TileMovement};
pub use ops::{can_move, is_game_over, shift, spawn_random_tile, MoveResult, DEFAULT_FOUR_PROBABILITY};
pub use state::{Cells, Grid, Move, Pos, SIZE};
