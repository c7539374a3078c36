//! Simple scripted players for headless runs and benches.

use std::time::Duration;

use rand::Rng;

use crate::engine::{AppliedMove, Game, Grid, Move, Submit};
use crate::snake::{Cell, Phase, SnakeGame, Tick};

/// Corner-hugging priority: keep big tiles in the bottom-left.
pub const CORNER_PRIORITY: [Move; 4] = [Move::Down, Move::Left, Move::Right, Move::Up];

/// First move in `priority` that changes the grid, or `None` when stuck.
///
/// ```
/// use arcade_grid::autoplay::{next_move, CORNER_PRIORITY};
/// use arcade_grid::{engine::Grid, Move};
/// let g = Grid::from_rows([[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [2, 4, 8, 16]]);
/// // bottom row is full and settled, only up changes anything
/// assert_eq!(next_move(g, &CORNER_PRIORITY), Some(Move::Up));
/// ```
pub fn next_move(grid: Grid, priority: &[Move]) -> Option<Move> {
    priority.iter().copied().find(|&dir| grid.shift(dir).moved)
}

/// Greedy snake policy: among the safe headings, take the one closest to the food.
///
/// Safe means the next head cell is on the board (or wraps, in wrapping modes) and
/// not already part of the body. Falls back to the current heading when nothing is safe.
pub fn snake_move(game: &SnakeGame) -> Move {
    let cfg = game.config();
    let (w, h) = (cfg.width, cfg.height);
    let walls = game.mode().has_walls();
    let current = game.direction();
    let food = game.food().cell;

    let candidates = Move::ALL.into_iter().filter(|&d| d != current.opposite()).filter_map(|d| {
        let mut next = game.head().step(d);
        if walls {
            if !next.in_bounds(w, h) || game.body().any(|c| *c == next) {
                return None;
            }
        } else {
            next = next.wrapped(w, h);
        }
        Some((distance(next, food, w, h, !walls), d))
    });
    candidates.min_by_key(|&(dist, _)| dist).map_or(current, |(_, d)| d)
}

/// How a scripted run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Accepted moves (2048) or ticks played (Snake).
    pub steps: u64,
    /// Simulated time the run would have taken on screen.
    pub elapsed: Duration,
    /// The game reached game over rather than hitting the step limit.
    pub finished: bool,
}

/// Play `game` with [`CORNER_PRIORITY`] on a simulated clock, settling each move
/// as soon as its animation deadline passes.
///
/// `on_move` sees every accepted move after it settled.
pub fn play_twenty48<R, F>(game: &mut Game, rng: &mut R, max_moves: Option<u64>, mut on_move: F) -> RunSummary
where
    R: Rng + ?Sized,
    F: FnMut(Move, &AppliedMove, &Game),
{
    let mut now = Duration::ZERO;
    let mut steps = 0u64;
    while let Some(dir) = next_move(game.grid(), &CORNER_PRIORITY) {
        if max_moves.is_some_and(|limit| steps >= limit) {
            break;
        }
        let Submit::Applied(applied) = game.submit(dir, now) else {
            break;
        };
        now = applied.settle_at;
        game.settle(now, rng);
        steps += 1;
        on_move(dir, &applied, game);
    }
    RunSummary { steps, elapsed: now, finished: game.is_over() }
}

/// Play `game` with [`snake_move`] for at most `max_ticks` ticks, starting it if idle.
pub fn play_snake<R, F>(game: &mut SnakeGame, rng: &mut R, max_ticks: u64, mut on_tick: F) -> RunSummary
where
    R: Rng + ?Sized,
    F: FnMut(Tick),
{
    if game.phase() == Phase::Idle {
        game.turn(snake_move(game));
    }
    let mut elapsed = Duration::ZERO;
    let mut steps = 0u64;
    while steps < max_ticks && game.phase() == Phase::Running {
        game.turn(snake_move(game));
        elapsed += game.interval();
        steps += 1;
        on_tick(game.tick(rng));
    }
    RunSummary { steps, elapsed, finished: game.phase() == Phase::GameOver }
}

fn distance(a: Cell, b: Cell, w: i32, h: i32, wrapping: bool) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    if wrapping {
        dx.min(w - dx) + dy.min(h - dy)
    } else {
        dx + dy
    }
}
