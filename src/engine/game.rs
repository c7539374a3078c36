use std::time::Duration;

use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use super::movement::{AnimationTiming, TileMovement};
use super::ops::{self, spawn_random_tile};
use super::state::{Cells, Grid, Move};
use crate::config::Twenty48Config;
use crate::scores::{ScoreError, ScoreStore};

/// Key the 2048 high-score list is stored under.
pub const SCORE_KEY: &str = "2048";

/// Where the session is in the move → animate → settle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting input.
    Ready,
    /// A move was applied; the spawn happens once `deadline` passes.
    AnimationPending { deadline: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    GameOver,
    AnimationPending,
}

/// A move that changed the grid and is now animating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub score_delta: u64,
    pub movements: Vec<TileMovement>,
    /// Earliest time `settle` will complete the move.
    pub settle_at: Duration,
}

/// Result of `Game::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    Applied(AppliedMove),
    /// Nothing could slide or merge in that direction.
    NoOp,
    Rejected(Rejection),
}

/// What happened when a pending move settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub spawned: Option<TileMovement>,
    /// The win tile appeared for the first time this game.
    pub won: bool,
    /// No further move is possible.
    pub game_over: bool,
}

/// Read-only view for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub grid: Cells,
    pub score: u64,
    pub best: u64,
    pub won: bool,
    pub win_notice: bool,
    pub over: bool,
    pub animating: bool,
}

/// One 2048 session.
///
/// Time is passed in by the caller as a monotonically increasing
/// `Duration`, so the settle timer is a single scheduled wake-up and tests
/// can drive it without a clock.
#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    score: u64,
    best: u64,
    won: bool,
    win_notice: bool,
    over: bool,
    phase: Phase,
    rules: Twenty48Config,
    timing: AnimationTiming,
}

impl Game {
    /// Start a game with two seeded tiles.
    ///
    /// ```
    /// use arcade_grid::config::Twenty48Config;
    /// use arcade_grid::engine::Game;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let game = Game::new(Twenty48Config::default(), &mut rng);
    /// assert_eq!(game.grid().count_empty(), 14);
    /// assert_eq!(game.score(), 0);
    /// ```
    pub fn new<R: Rng + ?Sized>(rules: Twenty48Config, rng: &mut R) -> Self {
        let mut game = Self::from_grid(Grid::EMPTY, rules);
        game.restart(rng);
        game
    }

    /// Resume from an existing grid. No tiles are added.
    pub fn from_grid(grid: Grid, rules: Twenty48Config) -> Self {
        let timing = rules.timing();
        Self {
            grid,
            score: 0,
            best: 0,
            won: grid.has_tile(rules.win_tile),
            win_notice: false,
            over: ops::is_game_over(grid),
            phase: Phase::Ready,
            rules,
            timing,
        }
    }

    /// Seed the best score shown alongside the current one.
    pub fn with_best(mut self, best: u64) -> Self {
        self.best = best.max(self.score);
        self
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn best(&self) -> u64 {
        self.best
    }

    #[inline]
    pub fn is_won(&self) -> bool {
        self.won
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.over
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::AnimationPending { .. })
    }

    /// Animation durations in effect; renderers use `slide` for the tile transition.
    #[inline]
    pub fn timing(&self) -> AnimationTiming {
        self.timing
    }

    /// Apply `dir` at time `now`.
    ///
    /// Input during an animation or after the game ended is dropped, not queued.
    pub fn submit(&mut self, dir: Move, now: Duration) -> Submit {
        if self.over {
            debug!("ignoring {dir}: game over");
            return Submit::Rejected(Rejection::GameOver);
        }
        if self.is_animating() {
            debug!("ignoring {dir}: animation pending");
            return Submit::Rejected(Rejection::AnimationPending);
        }

        let result = ops::shift(self.grid, dir);
        if !result.moved {
            debug!("{dir} is a no-op");
            return Submit::NoOp;
        }

        self.grid = result.grid;
        self.score += result.score;
        let settle_at = now + self.timing.settle_delay(&result.movements);
        self.phase = Phase::AnimationPending { deadline: settle_at };
        Submit::Applied(AppliedMove { score_delta: result.score, movements: result.movements, settle_at })
    }

    /// Finish a pending move once its animation deadline has passed:
    /// spawn one tile, then evaluate win and loss.
    ///
    /// Returns `None` when nothing is pending or the deadline is still ahead.
    pub fn settle<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) -> Option<Settled> {
        let Phase::AnimationPending { deadline } = self.phase else {
            return None;
        };
        if now < deadline {
            return None;
        }

        let spawned = spawn_random_tile(&mut self.grid, self.rules.four_probability, rng)
            .map(|(pos, _)| TileMovement::spawned(pos));
        self.phase = Phase::Ready;
        self.best = self.best.max(self.score);

        let mut settled = Settled { spawned, won: false, game_over: false };
        if !self.won && self.grid.has_tile(self.rules.win_tile) {
            info!("reached {} with score {}", self.rules.win_tile, self.score);
            self.won = true;
            self.win_notice = true;
            settled.won = true;
        }
        if ops::is_game_over(self.grid) {
            info!("game over with score {}", self.score);
            self.over = true;
            settled.game_over = true;
        }
        Some(settled)
    }

    /// Hide the win notification. The game stays won; it will not trigger again.
    pub fn dismiss_win(&mut self) {
        self.win_notice = false;
    }

    /// Clear the board and seed two tiles. Any pending animation is discarded.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.grid = Grid::EMPTY;
        for _ in 0..2 {
            spawn_random_tile(&mut self.grid, self.rules.four_probability, rng);
        }
        self.score = 0;
        self.won = false;
        self.win_notice = false;
        self.over = false;
        self.phase = Phase::Ready;
    }

    /// Store the final score in the 2048 list. Returns the rank if it made the list.
    ///
    /// Only a finished game is recorded; an unfinished one leaves the store untouched.
    pub fn record_score<S: ScoreStore + ?Sized>(
        &self,
        store: &mut S,
        capacity: usize,
    ) -> Result<Option<usize>, ScoreError> {
        if !self.over {
            debug!("not recording score {}: game still in progress", self.score);
            return Ok(None);
        }
        let rank = store.record(SCORE_KEY, self.score, capacity)?;
        if let Some(rank) = rank {
            info!("score {} entered the 2048 high scores at #{}", self.score, rank + 1);
        }
        Ok(rank)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: *self.grid.rows(),
            score: self.score,
            best: self.best,
            won: self.won,
            win_notice: self.win_notice,
            over: self.over,
            animating: self.is_animating(),
        }
    }
}
