use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ops::{self, MoveResult};

/// Side length of the 2048 grid.
pub const SIZE: usize = 4;

/// Row-major cell values. `0` is empty, anything else is a power of two >= 2.
pub type Cells = [[u32; SIZE]; SIZE];

/// A direction to move/merge tiles (2048) or to steer the snake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Left/right move rows, up/down move columns.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Move::Left | Move::Right)
    }

    /// Right and down compact toward the far end of the line.
    #[inline]
    pub fn is_reversed(self) -> bool {
        matches!(self, Move::Right | Move::Down)
    }

    #[inline]
    pub fn opposite(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Unit step as `(dx, dy)` with y growing downward.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Move::Up => (0, -1),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
            Move::Right => (1, 0),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(s)
    }
}

/// A cell coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }
}

/// The 4x4 2048 grid.
///
/// `Grid` is a small `Copy` value; every operation returns a new grid rather
/// than mutating in place, so callers own the state explicitly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid(pub(crate) Cells);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// Build a grid from row-major values.
    ///
    /// ```
    /// use arcade_grid::engine::Grid;
    /// let g = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(g.get(0, 1), 2);
    /// ```
    #[inline]
    pub fn from_rows(rows: Cells) -> Self {
        Grid(rows)
    }

    /// Borrow the row-major values.
    #[inline]
    pub fn rows(&self) -> &Cells {
        &self.0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.0[row][col]
    }

    #[inline]
    pub fn at(&self, pos: Pos) -> u32 {
        self.0[pos.row][pos.col]
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: Pos, value: u32) {
        self.0[pos.row][pos.col] = value;
    }

    /// Slide/merge tiles in `dir` (no random insert).
    ///
    /// ```
    /// use arcade_grid::engine::{Grid, Move};
    /// let g = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let r = g.shift(Move::Left);
    /// assert!(r.moved);
    /// assert_eq!(r.score, 4);
    /// assert_eq!(r.grid.rows()[0], [4, 0, 0, 0]);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> MoveResult {
        ops::shift(self, dir)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty cell, using the provided RNG.
    /// A full grid is returned unchanged.
    ///
    /// ```
    /// use arcade_grid::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        ops::spawn_random_tile(&mut self, ops::DEFAULT_FOUR_PROBABILITY, rng);
        self
    }

    /// Perform a move then insert a random tile if the move changed the grid.
    ///
    /// Returns the new grid and the score earned by merges.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, dir: Move, rng: &mut R) -> (Self, u64) {
        let result = self.shift(dir);
        if result.moved {
            (result.grid.with_random_tile(rng), result.score)
        } else {
            (self, 0)
        }
    }

    /// Number of empty cells.
    #[inline]
    pub fn count_empty(self) -> usize {
        self.tiles().filter(|&v| v == 0).count()
    }

    #[inline]
    pub fn is_full(self) -> bool {
        self.count_empty() == 0
    }

    /// Highest tile value present (0 on an empty grid).
    #[inline]
    pub fn highest_tile(self) -> u32 {
        self.tiles().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    #[inline]
    pub fn sum(self) -> u64 {
        self.tiles().map(u64::from).sum()
    }

    /// True if any cell holds at least `target`.
    #[inline]
    pub fn has_tile(self, target: u32) -> bool {
        self.tiles().any(|v| v >= target)
    }

    /// True when the grid is full and no two neighbours share a value.
    ///
    /// ```
    /// use arcade_grid::engine::Grid;
    /// let g = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    /// assert!(g.is_game_over());
    /// assert!(!Grid::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(self) -> bool {
        ops::is_game_over(self)
    }

    /// Iterate over cell values in row-major order.
    #[inline]
    pub fn tiles(self) -> impl Iterator<Item = u32> {
        self.0.into_iter().flatten()
    }

    /// Positions of the empty cells in row-major order.
    pub fn empty_cells(self) -> Vec<Pos> {
        let mut cells = Vec::with_capacity(SIZE * SIZE);
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.0[row][col] == 0 {
                    cells.push(Pos::new(row, col));
                }
            }
        }
        cells
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "-------------------------------";
        writeln!(f)?;
        for (idx, row) in self.0.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
            if idx + 1 < SIZE {
                writeln!(f, "{RULE}")?;
            }
        }
        Ok(())
    }
}

impl From<Cells> for Grid {
    fn from(rows: Cells) -> Self {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Cells {
    fn from(g: Grid) -> Self {
        g.0
    }
}

fn format_val(val: u32) -> String {
    match val {
        0 => " ".repeat(7),
        v => format!("{v:^7}"),
    }
}
