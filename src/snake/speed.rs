use std::time::Duration;

use crate::config::SnakeConfig;

/// Temporary multiplier on snake speed, counted down once per tick.
///
/// A factor above 1.0 shortens the tick interval; below 1.0 lengthens it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedModifier {
    factor: f64,
    remaining: u32,
}

impl Default for SpeedModifier {
    fn default() -> Self {
        Self { factor: 1.0, remaining: 0 }
    }
}

impl SpeedModifier {
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Ticks left before the factor resets to 1.0.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Replace any active modifier.
    pub fn apply(&mut self, factor: f64, ticks: u32) {
        self.factor = factor;
        self.remaining = ticks;
    }

    /// Count one tick down. Returns true when the modifier expired on this tick.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.factor = 1.0;
            return true;
        }
        false
    }

    /// Tick period: `base / factor`, clamped to the configured bounds.
    ///
    /// ```
    /// use arcade_grid::config::SnakeConfig;
    /// use arcade_grid::snake::SpeedModifier;
    /// use std::time::Duration;
    /// let mut speed = SpeedModifier::default();
    /// let cfg = SnakeConfig::default();
    /// assert_eq!(speed.interval(&cfg), Duration::from_millis(150));
    /// speed.apply(1.5, 100);
    /// assert_eq!(speed.interval(&cfg), Duration::from_millis(100));
    /// ```
    pub fn interval(&self, cfg: &SnakeConfig) -> Duration {
        let raw = cfg.base_interval().as_secs_f64() * 1000.0 / self.factor;
        // inverted bounds resolve to the upper one
        let ms = raw.max(cfg.min_interval_ms as f64).min(cfg.max_interval_ms as f64);
        Duration::from_micros((ms * 1000.0).round() as u64)
    }
}
