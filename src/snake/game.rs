use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use super::food::{free_cell, Food, FoodKind, FAST_POTION, SCISSORS_CUT, SLOW_POTION};
use super::speed::SpeedModifier;
use super::state::{Cell, Mode, Phase};
use crate::config::SnakeConfig;
use crate::engine::Move;
use crate::scores::{ScoreError, ScoreStore};

/// How a direction input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// First direction of a round; the snake starts moving.
    Started,
    /// A paused round resumed.
    Resumed,
    /// Stored as the heading for the next tick.
    Buffered,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    Wall,
    SelfHit,
    /// No free cell is left for food.
    BoardFull,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The round is not running.
    Skipped,
    Moved,
    Ate(FoodKind),
    Crashed(Crash),
}

/// Read-only view for renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Head first.
    pub body: Vec<Cell>,
    pub food: Food,
    pub score: u64,
    pub mode: Mode,
    pub phase: Phase,
    pub frame: u64,
    pub speed_factor: f64,
}

/// One snake round and the rules of its mode.
#[derive(Debug, Clone)]
pub struct SnakeGame {
    cfg: SnakeConfig,
    mode: Mode,
    body: VecDeque<Cell>,
    direction: Move,
    next_direction: Move,
    food: Food,
    score: u64,
    phase: Phase,
    speed: SpeedModifier,
    frame: u64,
}

impl SnakeGame {
    /// Create a round in `Idle`, waiting for the first direction.
    ///
    /// ```
    /// use arcade_grid::config::SnakeConfig;
    /// use arcade_grid::engine::Move;
    /// use arcade_grid::snake::{Input, Mode, Phase, SnakeGame, Tick};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let mut game = SnakeGame::new(SnakeConfig::default(), Mode::Classic, &mut rng);
    /// assert_eq!(game.phase(), Phase::Idle);
    /// assert_eq!(game.turn(Move::Down), Input::Ignored);
    /// assert_eq!(game.turn(Move::Up), Input::Started);
    /// assert_ne!(game.tick(&mut rng), Tick::Skipped);
    /// ```
    pub fn new<R: Rng + ?Sized>(cfg: SnakeConfig, mode: Mode, rng: &mut R) -> Self {
        let mut game = Self {
            cfg,
            mode,
            body: VecDeque::new(),
            direction: Move::Up,
            next_direction: Move::Up,
            food: Food { cell: Cell::new(0, 0), kind: FoodKind::Normal },
            score: 0,
            phase: Phase::Idle,
            speed: SpeedModifier::default(),
            frame: 0,
        };
        game.reset(rng);
        game
    }

    /// Back to `Idle` with a fresh three-segment snake facing up from the centre.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (cx, cy) = (self.cfg.width / 2, self.cfg.height / 2);
        self.body = (0..3).map(|i| Cell::new(cx, cy + i)).collect();
        self.direction = Move::Up;
        self.next_direction = Move::Up;
        self.score = 0;
        self.phase = Phase::Idle;
        self.speed = SpeedModifier::default();
        self.frame = 0;
        if !self.respawn_food(rng) {
            self.phase = Phase::GameOver;
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    #[inline]
    pub fn body(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[inline]
    pub fn food(&self) -> Food {
        self.food
    }

    #[inline]
    pub fn direction(&self) -> Move {
        self.direction
    }

    #[inline]
    pub fn speed(&self) -> SpeedModifier {
        self.speed
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.cfg
    }

    /// Current tick period; reschedule the timer when it changes.
    pub fn interval(&self) -> Duration {
        self.speed.interval(&self.cfg)
    }

    /// Feed one direction input.
    ///
    /// Starting downward is refused since the tail sits below the head.
    /// While running, reversing into the current heading is ignored.
    pub fn turn(&mut self, dir: Move) -> Input {
        match self.phase {
            Phase::Idle => {
                if dir == Move::Down {
                    return Input::Ignored;
                }
                self.direction = dir;
                self.next_direction = dir;
                self.phase = Phase::Running;
                debug!("snake round started heading {dir}");
                Input::Started
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                Input::Resumed
            }
            Phase::Running => {
                if dir == self.direction.opposite() {
                    return Input::Ignored;
                }
                self.next_direction = dir;
                Input::Buffered
            }
            Phase::GameOver => Input::Ignored,
        }
    }

    /// Flip between running and paused. Returns true if the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            _ => return false,
        };
        true
    }

    /// Advance the round by one step.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Tick {
        if self.phase != Phase::Running {
            return Tick::Skipped;
        }
        self.frame += 1;
        if self.speed.tick() {
            debug!("speed modifier expired");
        }

        self.direction = self.next_direction;
        let mut head = self.head().step(self.direction);
        if self.mode.has_walls() {
            if !head.in_bounds(self.cfg.width, self.cfg.height) {
                return self.crash(Crash::Wall);
            }
            if self.body.contains(&head) {
                return self.crash(Crash::SelfHit);
            }
        } else {
            head = head.wrapped(self.cfg.width, self.cfg.height);
        }

        self.body.push_front(head);
        if head != self.food.cell {
            self.body.pop_back();
            return Tick::Moved;
        }

        let kind = self.food.kind;
        self.eat(kind);
        if !self.respawn_food(rng) {
            return self.crash(Crash::BoardFull);
        }
        Tick::Ate(kind)
    }

    fn eat(&mut self, kind: FoodKind) {
        self.score += self.cfg.points_per_food;
        match kind {
            FoodKind::Normal | FoodKind::Golden => {}
            FoodKind::BluePotion => self.speed.apply(SLOW_POTION.0, SLOW_POTION.1),
            FoodKind::RedPotion => self.speed.apply(FAST_POTION.0, FAST_POTION.1),
            FoodKind::Scissors => {
                let cut = SCISSORS_CUT.min(self.body.len() - 1);
                self.body.truncate(self.body.len() - cut);
            }
        }
        debug!("ate {kind:?}, score {}, length {}", self.score, self.body.len());
    }

    fn respawn_food<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match free_cell(&self.body, self.cfg.width, self.cfg.height, rng) {
            Some(cell) => {
                self.food = Food { cell, kind: FoodKind::roll(self.mode, rng) };
                true
            }
            None => false,
        }
    }

    fn crash(&mut self, crash: Crash) -> Tick {
        self.phase = Phase::GameOver;
        info!("snake ({}) crashed: {crash:?}, score {}", self.mode, self.score);
        Tick::Crashed(crash)
    }

    /// Store the score in this mode's list once the round is over.
    /// Zen rounds and rounds still in progress are never recorded.
    pub fn record_score<S: ScoreStore + ?Sized>(
        &self,
        store: &mut S,
        capacity: usize,
    ) -> Result<Option<usize>, ScoreError> {
        let Some(key) = self.mode.score_key() else {
            return Ok(None);
        };
        if self.phase != Phase::GameOver {
            debug!("not recording score {}: round still in progress", self.score);
            return Ok(None);
        }
        let rank = store.record(key, self.score, capacity)?;
        if let Some(rank) = rank {
            info!("score {} entered the {} high scores at #{}", self.score, self.mode, rank + 1);
        }
        Ok(rank)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.body.iter().copied().collect(),
            food: self.food,
            score: self.score,
            mode: self.mode,
            phase: self.phase,
            frame: self.frame,
            speed_factor: self.speed.factor(),
        }
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, cell: Cell, kind: FoodKind) {
        self.food = Food { cell, kind };
    }

    #[cfg(test)]
    pub(crate) fn set_body(&mut self, cells: &[Cell]) {
        self.body = cells.iter().copied().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{MemoryStore, CAPACITY};
    use rand::{rngs::StdRng, SeedableRng};

    fn started(mode: Mode, dir: Move) -> (SnakeGame, StdRng) {
        let mut rng = StdRng::seed_from_u64(21);
        let mut g = SnakeGame::new(SnakeConfig::default(), mode, &mut rng);
        // keep food out of the way unless a test places it
        g.place_food(Cell::new(0, 19), FoodKind::Normal);
        assert_eq!(g.turn(dir), Input::Started);
        (g, rng)
    }

    #[test]
    fn starts_vertical_in_centre() {
        let mut rng = StdRng::seed_from_u64(0);
        let g = SnakeGame::new(SnakeConfig::default(), Mode::Classic, &mut rng);
        let body: Vec<Cell> = g.body().copied().collect();
        assert_eq!(body, vec![Cell::new(10, 10), Cell::new(10, 11), Cell::new(10, 12)]);
        assert!(!body.contains(&g.food().cell));
        assert_eq!(g.phase(), Phase::Idle);
    }

    #[test]
    fn idle_ticks_do_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut g = SnakeGame::new(SnakeConfig::default(), Mode::Classic, &mut rng);
        assert_eq!(g.tick(&mut rng), Tick::Skipped);
        assert_eq!(g.head(), Cell::new(10, 10));
    }

    #[test]
    fn reversal_is_ignored() {
        let (mut g, mut rng) = started(Mode::Classic, Move::Right);
        assert_eq!(g.turn(Move::Left), Input::Ignored);
        assert_eq!(g.tick(&mut rng), Tick::Moved);
        assert_eq!(g.head(), Cell::new(11, 10));
        assert_eq!(g.turn(Move::Up), Input::Buffered);
        assert_eq!(g.tick(&mut rng), Tick::Moved);
        assert_eq!(g.head(), Cell::new(11, 9));
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn classic_wall_ends_round() {
        let (mut g, mut rng) = started(Mode::Classic, Move::Up);
        for _ in 0..10 {
            assert_eq!(g.tick(&mut rng), Tick::Moved);
        }
        assert_eq!(g.head(), Cell::new(10, 0));
        assert_eq!(g.tick(&mut rng), Tick::Crashed(Crash::Wall));
        assert_eq!(g.phase(), Phase::GameOver);
        assert_eq!(g.tick(&mut rng), Tick::Skipped);
        assert_eq!(g.turn(Move::Left), Input::Ignored);
    }

    #[test]
    fn zen_wraps_around() {
        let (mut g, mut rng) = started(Mode::Zen, Move::Up);
        for _ in 0..11 {
            assert_eq!(g.tick(&mut rng), Tick::Moved);
        }
        assert_eq!(g.head(), Cell::new(10, 19));
        assert_eq!(g.phase(), Phase::Running);
    }

    #[test]
    fn classic_self_collision() {
        let (mut g, mut rng) = started(Mode::Classic, Move::Up);
        // a hook shape: turning down-left-up runs into the body
        g.set_body(&[
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(4, 6),
            Cell::new(4, 5),
            Cell::new(4, 4),
        ]);
        assert_eq!(g.turn(Move::Left), Input::Buffered);
        assert_eq!(g.tick(&mut rng), Tick::Crashed(Crash::SelfHit));
    }

    #[test]
    fn zen_passes_through_itself() {
        let (mut g, mut rng) = started(Mode::Zen, Move::Up);
        g.set_body(&[
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(4, 6),
            Cell::new(4, 5),
            Cell::new(4, 4),
        ]);
        g.turn(Move::Left);
        assert_eq!(g.tick(&mut rng), Tick::Moved);
        assert_eq!(g.head(), Cell::new(4, 5));
        assert_eq!(g.len(), 5);
    }

    #[test]
    fn eating_grows_and_scores() {
        let (mut g, mut rng) = started(Mode::Classic, Move::Up);
        g.place_food(Cell::new(10, 9), FoodKind::Normal);
        assert_eq!(g.tick(&mut rng), Tick::Ate(FoodKind::Normal));
        assert_eq!(g.len(), 4);
        assert_eq!(g.score(), 10);
        let food = g.food().cell;
        assert!(!g.body().any(|c| *c == food));
    }

    #[test]
    fn potions_change_interval_then_expire() {
        let (mut g, mut rng) = started(Mode::PowerUp, Move::Up);
        g.place_food(Cell::new(10, 9), FoodKind::RedPotion);
        assert_eq!(g.tick(&mut rng), Tick::Ate(FoodKind::RedPotion));
        assert_eq!(g.interval(), Duration::from_millis(100));
        assert_eq!(g.score(), 10);

        g.set_body(&[Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]);
        g.place_food(Cell::new(19, 19), FoodKind::Normal);
        g.turn(Move::Right);
        for _ in 0..FAST_POTION.1 - 1 {
            g.tick(&mut rng);
            // stay on row 0 then wrap back with a turn before the wall
            if g.head().x == 18 && g.direction() == Move::Right {
                g.turn(Move::Down);
            } else if g.head().y == 1 && g.direction() == Move::Down {
                g.turn(Move::Left);
            } else if g.head().x == 1 && g.direction() == Move::Left {
                g.turn(Move::Up);
            } else if g.head().y == 0 && g.direction() == Move::Up {
                g.turn(Move::Right);
            }
        }
        assert_eq!(g.phase(), Phase::Running);
        assert_eq!(g.speed().remaining(), 1);
        g.tick(&mut rng);
        assert_eq!(g.interval(), Duration::from_millis(150));
    }

    #[test]
    fn blue_potion_slows() {
        let (mut g, mut rng) = started(Mode::PowerUp, Move::Up);
        g.place_food(Cell::new(10, 9), FoodKind::BluePotion);
        g.tick(&mut rng);
        assert_eq!(g.interval(), Duration::from_millis(250));
        assert_eq!(g.speed().remaining(), SLOW_POTION.1);
    }

    #[test]
    fn scissors_trim_tail_but_keep_head() {
        let (mut g, mut rng) = started(Mode::PowerUp, Move::Up);
        g.place_food(Cell::new(10, 9), FoodKind::Scissors);
        assert_eq!(g.tick(&mut rng), Tick::Ate(FoodKind::Scissors));
        // grew to 4, then lost 3
        assert_eq!(g.len(), 1);
        assert_eq!(g.head(), Cell::new(10, 9));

        g.place_food(Cell::new(10, 8), FoodKind::Scissors);
        g.tick(&mut rng);
        // grew to 2, can only lose 1
        assert_eq!(g.len(), 1);
        assert_eq!(g.score(), 20);
    }

    #[test]
    fn pause_blocks_ticks_and_direction_resumes() {
        let (mut g, mut rng) = started(Mode::Classic, Move::Up);
        assert!(g.toggle_pause());
        assert_eq!(g.phase(), Phase::Paused);
        assert_eq!(g.tick(&mut rng), Tick::Skipped);
        assert_eq!(g.turn(Move::Left), Input::Resumed);
        // resuming does not change the heading
        assert_eq!(g.tick(&mut rng), Tick::Moved);
        assert_eq!(g.head(), Cell::new(10, 9));
    }

    #[test]
    fn toggle_pause_ignored_when_idle() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut g = SnakeGame::new(SnakeConfig::default(), Mode::Classic, &mut rng);
        assert!(!g.toggle_pause());
        assert_eq!(g.phase(), Phase::Idle);
    }

    #[test]
    fn board_full_ends_round() {
        let cfg = SnakeConfig { width: 3, height: 5, ..SnakeConfig::default() };
        let mut rng = StdRng::seed_from_u64(4);
        let mut g = SnakeGame::new(cfg, Mode::Classic, &mut rng);
        // fill every cell but (1,1) with the snake, head at (1,2) below the food
        let mut cells = vec![Cell::new(1, 2)];
        for y in 0..5 {
            for x in 0..3 {
                let c = Cell::new(x, y);
                if c != Cell::new(1, 1) && c != Cell::new(1, 2) {
                    cells.push(c);
                }
            }
        }
        g.set_body(&cells);
        g.place_food(Cell::new(1, 1), FoodKind::Normal);
        g.turn(Move::Up);
        assert_eq!(g.tick(&mut rng), Tick::Crashed(Crash::BoardFull));
        assert_eq!(g.score(), 10);
    }

    #[test]
    fn scores_recorded_per_mode() {
        let mut store = MemoryStore::new();
        let (mut g, mut rng) = started(Mode::Classic, Move::Up);
        g.place_food(Cell::new(10, 9), FoodKind::Normal);
        g.tick(&mut rng);
        // still running: nothing is written
        assert_eq!(g.record_score(&mut store, CAPACITY).unwrap(), None);
        assert!(store.load("snake.classic", CAPACITY).is_empty());

        // straight up into the top wall
        while g.phase() == Phase::Running {
            g.tick(&mut rng);
        }
        assert_eq!(g.record_score(&mut store, CAPACITY).unwrap(), Some(0));

        let (mut z, mut zrng) = started(Mode::Zen, Move::Up);
        z.tick(&mut zrng);
        assert_eq!(z.record_score(&mut store, CAPACITY).unwrap(), None);

        assert_eq!(store.load("snake.classic", CAPACITY).as_slice(), &[g.score()]);
        assert!(g.score() >= 10);
        assert!(store.load("snake.powerup", CAPACITY).is_empty());
    }

    #[test]
    fn reset_returns_to_idle() {
        let (mut g, mut rng) = started(Mode::PowerUp, Move::Up);
        g.place_food(Cell::new(10, 9), FoodKind::RedPotion);
        g.tick(&mut rng);
        g.reset(&mut rng);
        assert_eq!(g.phase(), Phase::Idle);
        assert_eq!(g.score(), 0);
        assert_eq!(g.len(), 3);
        assert_eq!(g.speed(), SpeedModifier::default());
    }
}
