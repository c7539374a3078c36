//! Tile provenance for slide animations.
//!
//! The merge pass records which original cell every output tile came from,
//! so renderers can animate a tile sliding from `from` to `to` instead of
//! popping into place. A merge product is attributed to the *further* of its
//! two contributors: the far tile visibly travels to meet the near one.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ops;
use super::state::{Grid, Move, Pos, SIZE};

/// Provenance of one tile after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileMovement {
    pub from: Pos,
    pub to: Pos,
    /// The tile at `to` is the product of a merge.
    pub merged: bool,
    /// The tile at `to` was placed by the spawner after compaction.
    pub spawned: bool,
}

impl TileMovement {
    #[inline]
    pub(crate) fn slid(from: Pos, to: Pos) -> Self {
        TileMovement { from, to, merged: false, spawned: false }
    }

    #[inline]
    pub(crate) fn merged(from: Pos, to: Pos) -> Self {
        TileMovement { from, to, merged: true, spawned: false }
    }

    #[inline]
    pub(crate) fn spawned(at: Pos) -> Self {
        TileMovement { from: at, to: at, merged: false, spawned: true }
    }

    /// Displacement `(rows, cols)` from source to destination.
    #[inline]
    pub fn delta(&self) -> (isize, isize) {
        (
            self.to.row as isize - self.from.row as isize,
            self.to.col as isize - self.from.col as isize,
        )
    }

    /// True when the tile visibly travels.
    #[inline]
    pub fn slides(&self) -> bool {
        self.from != self.to
    }
}

/// Durations driving the settle phase after an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    /// Length of the slide transition itself.
    pub slide: Duration,
    /// Delay before settling when at least one tile slides.
    pub settle: Duration,
    /// Delay before settling when nothing slides (merge-in-place only).
    pub settle_idle: Duration,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            slide: Duration::from_millis(150),
            settle: Duration::from_millis(200),
            settle_idle: Duration::from_millis(50),
        }
    }
}

impl AnimationTiming {
    /// How long the renderer needs before the next move may start.
    pub fn settle_delay(&self, movements: &[TileMovement]) -> Duration {
        if movements.iter().any(TileMovement::slides) {
            self.settle
        } else {
            self.settle_idle
        }
    }
}

/// Rebuild per-tile movements from a pre-move grid, a post-move grid and the move.
///
/// The merge pass is replayed on `before` so attribution comes from its own
/// bookkeeping; any tile in `after` that the pass did not produce is the
/// spawned one.
///
/// ```
/// use arcade_grid::engine::{reconstruct, Grid, Move, Pos};
/// let before = Grid::from_rows([[2, 0, 2, 0], [0; 4], [0; 4], [0; 4]]);
/// let after = Grid::from_rows([[0, 0, 0, 4], [0; 4], [0; 4], [2, 0, 0, 0]]);
/// let moves = reconstruct(before, after, Move::Right);
/// let merged = moves.iter().find(|m| m.merged).unwrap();
/// assert_eq!((merged.from, merged.to), (Pos::new(0, 0), Pos::new(0, 3)));
/// assert!(moves.iter().any(|m| m.spawned && m.to == Pos::new(3, 0)));
/// ```
pub fn reconstruct(before: Grid, after: Grid, dir: Move) -> Vec<TileMovement> {
    let pass = ops::shift(before, dir);
    let mut movements = pass.movements;
    for row in 0..SIZE {
        for col in 0..SIZE {
            let pos = Pos::new(row, col);
            if after.at(pos) != 0 && pass.grid.at(pos) == 0 {
                movements.push(TileMovement::spawned(pos));
            }
        }
    }
    movements
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn row0(rows: [u32; SIZE]) -> Grid {
        Grid::from_rows([rows, [0; SIZE], [0; SIZE], [0; SIZE]])
    }

    #[test]
    fn merge_attributed_to_far_tile() {
        let r = ops::shift(row0([2, 2, 0, 0]), Move::Left);
        assert_eq!(r.movements, vec![TileMovement::merged(Pos::new(0, 1), Pos::new(0, 0))]);
    }

    #[test]
    fn merge_toward_right_edge() {
        let r = ops::shift(row0([2, 0, 2, 0]), Move::Right);
        assert_eq!(r.movements, vec![TileMovement::merged(Pos::new(0, 0), Pos::new(0, 3))]);
        assert_eq!(r.movements[0].delta(), (0, 3));
    }

    #[test]
    fn duplicate_values_are_not_double_counted() {
        // four equal tiles: two merges, each source consumed once
        let r = ops::shift(row0([4, 4, 4, 4]), Move::Left);
        let mut used = HashSet::new();
        for m in &r.movements {
            assert!(used.insert(m.from), "{:?} attributed twice", m.from);
        }
        assert_eq!(
            r.movements,
            vec![
                TileMovement::merged(Pos::new(0, 1), Pos::new(0, 0)),
                TileMovement::merged(Pos::new(0, 3), Pos::new(0, 1)),
            ]
        );
    }

    #[test]
    fn movements_follow_move_axis() {
        let g = Grid::from_rows([[2, 0, 0, 2], [0, 4, 0, 0], [8, 0, 8, 0], [0, 0, 0, 16]]);
        for dir in Move::ALL {
            let r = ops::shift(g, dir);
            for m in r.movements.iter().filter(|m| m.slides()) {
                let (dr, dc) = m.delta();
                if dir.is_horizontal() {
                    assert_eq!(dr, 0);
                    assert_eq!(dc.signum(), dir.delta().0 as isize);
                } else {
                    assert_eq!(dc, 0);
                    assert_eq!(dr.signum(), dir.delta().1 as isize);
                }
            }
        }
    }

    #[test]
    fn stationary_tiles_do_not_slide() {
        let r = ops::shift(row0([2, 4, 0, 0]), Move::Left);
        assert!(r.movements.iter().all(|m| !m.slides()));
        assert!(!r.moved);
    }

    #[test]
    fn reconstruct_marks_spawn() {
        let before = row0([0, 0, 0, 2]);
        let after = Grid::from_rows([[2, 0, 4, 0], [0; SIZE], [0; SIZE], [0; SIZE]]);
        let moves = reconstruct(before, after, Move::Left);
        assert_eq!(
            moves,
            vec![
                TileMovement::slid(Pos::new(0, 3), Pos::new(0, 0)),
                TileMovement::spawned(Pos::new(0, 2)),
            ]
        );
    }

    #[test]
    fn settle_delay_depends_on_sliding() {
        let timing = AnimationTiming::default();
        let still = [TileMovement::slid(Pos::new(0, 0), Pos::new(0, 0))];
        let moving = [TileMovement::slid(Pos::new(0, 3), Pos::new(0, 0))];
        assert_eq!(timing.settle_delay(&still), Duration::from_millis(50));
        assert_eq!(timing.settle_delay(&moving), Duration::from_millis(200));
    }
}
