use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Cell, Mode};

/// Speed factor and duration (in ticks) of the blue potion.
pub const SLOW_POTION: (f64, u32) = (0.6, 150);
/// Speed factor and duration (in ticks) of the red potion.
pub const FAST_POTION: (f64, u32) = (1.5, 100);
/// Tail segments removed by scissors.
pub const SCISSORS_CUT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    Normal,
    /// Bonus points only.
    Golden,
    /// Slows the snake for a while.
    BluePotion,
    /// Speeds the snake up for a while.
    RedPotion,
    /// Trims the tail.
    Scissors,
}

impl FoodKind {
    /// Draw the kind of the next food item. Only power-up mode has specials:
    /// golden 5%, each potion 10%, scissors 10%.
    pub fn roll<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> FoodKind {
        if mode != Mode::PowerUp {
            return FoodKind::Normal;
        }
        match rng.gen::<f64>() {
            r if r < 0.05 => FoodKind::Golden,
            r if r < 0.15 => FoodKind::BluePotion,
            r if r < 0.25 => FoodKind::RedPotion,
            r if r < 0.35 => FoodKind::Scissors,
            _ => FoodKind::Normal,
        }
    }
}

/// The single food item on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub cell: Cell,
    pub kind: FoodKind,
}

/// Pick a uniformly random cell not covered by `occupied`.
///
/// Returns `None` when the snake fills the whole board.
pub fn free_cell<'a, R, I>(occupied: I, width: i32, height: i32, rng: &mut R) -> Option<Cell>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a Cell>,
{
    let taken: std::collections::HashSet<Cell> = occupied.into_iter().copied().collect();
    let free: Vec<Cell> = (0..height)
        .flat_map(|y| (0..width).map(move |x| Cell::new(x, y)))
        .filter(|c| !taken.contains(c))
        .collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.gen_range(0..free.len())])
}
