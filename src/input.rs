//! Keyboard and swipe input, normalized to a [`Move`].

use crate::engine::Move;

/// Minimum swipe length in pixels along the dominant axis.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// Map a key name to a direction: arrow keys and WASD in either case.
///
/// Key names follow the DOM `KeyboardEvent.key` convention (`"ArrowUp"`, `"w"`).
///
/// ```
/// use arcade_grid::{input::direction_for_key, Move};
/// assert_eq!(direction_for_key("ArrowLeft"), Some(Move::Left));
/// assert_eq!(direction_for_key("S"), Some(Move::Down));
/// assert_eq!(direction_for_key("Enter"), None);
/// ```
pub fn direction_for_key(key: &str) -> Option<Move> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Move::Up),
        "ArrowDown" | "s" | "S" => Some(Move::Down),
        "ArrowLeft" | "a" | "A" => Some(Move::Left),
        "ArrowRight" | "d" | "D" => Some(Move::Right),
        _ => None,
    }
}

/// Map a swipe from touch-start to touch-end (screen coordinates, y down).
///
/// The axis with the larger travel wins; ties go to the vertical axis.
/// Swipes that do not exceed `threshold` on that axis are ignored.
pub fn direction_for_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Move> {
    if dx.abs() > dy.abs() {
        if dx.abs() <= threshold {
            return None;
        }
        Some(if dx > 0.0 { Move::Right } else { Move::Left })
    } else {
        if dy.abs() <= threshold {
            return None;
        }
        Some(if dy > 0.0 { Move::Down } else { Move::Up })
    }
}
