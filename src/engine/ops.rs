use rand::Rng;

use super::movement::TileMovement;
use super::state::{Grid, Move, Pos, SIZE};

/// Probability that a spawned tile is a 4 rather than a 2.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Outcome of sliding a grid in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Grid after compaction and merging. Identical to the input when `moved` is false.
    pub grid: Grid,
    /// Sum of every merge product produced by the move.
    pub score: u64,
    /// True iff at least one cell changed.
    pub moved: bool,
    /// Provenance of every tile in `grid`, gathered during the merge pass.
    pub movements: Vec<TileMovement>,
}

/// Where an output slot of a line came from, as indices into the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Source {
    /// The contributing tile closest to index 0.
    pub near: usize,
    /// Second contributor when the slot is a merge product.
    pub far: Option<usize>,
}

/// One line compacted toward index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineOutcome {
    pub cells: [u32; SIZE],
    pub sources: [Option<Source>; SIZE],
    pub score: u64,
}

/// Compact and merge a single line toward index 0.
///
/// A tile produced by a merge never merges again in the same pass.
pub(crate) fn merge_line(line: [u32; SIZE]) -> LineOutcome {
    let tiles: Vec<(usize, u32)> = line
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, v)| v != 0)
        .collect();

    let mut out = LineOutcome { cells: [0; SIZE], sources: [None; SIZE], score: 0 };
    let mut slot = 0;
    let mut i = 0;
    while i < tiles.len() {
        let (near, value) = tiles[i];
        match tiles.get(i + 1) {
            Some(&(far, next)) if next == value => {
                let merged = value * 2;
                out.cells[slot] = merged;
                out.sources[slot] = Some(Source { near, far: Some(far) });
                out.score += u64::from(merged);
                i += 2;
            }
            _ => {
                out.cells[slot] = value;
                out.sources[slot] = Some(Source { near, far: None });
                i += 1;
            }
        }
        slot += 1;
    }
    out
}

/// Grid coordinates of line `idx` for `dir`, ordered so index 0 is the edge
/// tiles slide toward.
pub(crate) fn line_positions(dir: Move, idx: usize) -> [Pos; SIZE] {
    let mut positions: [Pos; SIZE] = std::array::from_fn(|k| {
        if dir.is_horizontal() {
            Pos::new(idx, k)
        } else {
            Pos::new(k, idx)
        }
    });
    if dir.is_reversed() {
        positions.reverse();
    }
    positions
}

/// Slide/merge tiles in the given direction. No randomness.
///
/// Each of the four lines is processed independently; right and down reuse
/// the leftward pass on the reversed line.
pub fn shift(grid: Grid, dir: Move) -> MoveResult {
    let mut next = Grid::EMPTY;
    let mut score = 0;
    let mut movements = Vec::with_capacity(SIZE * SIZE);

    for idx in 0..SIZE {
        let positions = line_positions(dir, idx);
        let line = positions.map(|p| grid.at(p));
        let outcome = merge_line(line);
        score += outcome.score;

        for (slot, source) in outcome.sources.iter().enumerate() {
            let Some(source) = source else { break };
            let to = positions[slot];
            next.set(to, outcome.cells[slot]);
            movements.push(match source.far {
                Some(far) => TileMovement::merged(positions[far], to),
                None => TileMovement::slid(positions[source.near], to),
            });
        }
    }

    let moved = next != grid;
    if !moved {
        return MoveResult { grid, score: 0, moved, movements };
    }
    MoveResult { grid: next, score, moved, movements }
}

/// True if no two orthogonally adjacent cells share a value and none is empty.
pub fn is_game_over(grid: Grid) -> bool {
    let cells = grid.rows();
    for row in 0..SIZE {
        for col in 0..SIZE {
            let v = cells[row][col];
            if v == 0 {
                return false;
            }
            if row + 1 < SIZE && cells[row + 1][col] == v {
                return false;
            }
            if col + 1 < SIZE && cells[row][col + 1] == v {
                return false;
            }
        }
    }
    true
}

/// True if any direction would change the grid.
pub fn can_move(grid: Grid) -> bool {
    Move::ALL.into_iter().any(|dir| shift(grid, dir).moved)
}

/// Place one tile in a uniformly random empty cell: 4 with `four_probability`, else 2.
///
/// Returns the position and value placed, or `None` if the grid is full.
pub fn spawn_random_tile<R: Rng + ?Sized>(
    grid: &mut Grid,
    four_probability: f64,
    rng: &mut R,
) -> Option<(Pos, u32)> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let pos = empty[rng.gen_range(0..empty.len())];
    let value = generate_random_tile(four_probability, rng);
    grid.set(pos, value);
    Some((pos, value))
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(four_probability: f64, rng: &mut R) -> u32 {
    if rng.gen_bool(four_probability.clamp(0.0, 1.0)) { 4 } else { 2 }
}
