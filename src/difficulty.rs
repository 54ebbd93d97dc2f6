//! Run difficulty: starts at the chapter's base and rises by one every
//! `difficulty_interval_secs` of simulated time, without bound.
//!
//! The level is derived from total elapsed time, kept in `f64`.

use bevy::prelude::*;

/// Slack, in intervals, for `dt` values that are not exact in binary
/// (1/60 s summed 1800 times must still count as 30 s).
pub(crate) const INTERVAL_TOLERANCE: f64 = 1e-6;

/// Whole intervals contained in `elapsed_secs`.
pub(crate) fn whole_intervals(elapsed_secs: f64, interval_secs: f64) -> u64 {
    if !interval_secs.is_finite() || interval_secs <= 0.0 {
        return 0;
    }
    (elapsed_secs / interval_secs + INTERVAL_TOLERANCE).floor() as u64
}

#[derive(Debug, Clone)]
pub struct DifficultyScheduler {
    base: u32,
    difficulty: u32,
    interval_secs: f64,
    elapsed_secs: f64,
}

impl DifficultyScheduler {
    /// A non-positive interval disables increments.
    pub fn new(base: u32, interval_secs: f32) -> Self {
        Self {
            base,
            difficulty: base,
            interval_secs: if interval_secs > 0.0 {
                interval_secs as f64
            } else {
                f64::INFINITY
            },
            elapsed_secs: 0.0,
        }
    }

    #[inline]
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Seconds until the next increment.
    pub fn time_to_next(&self) -> f32 {
        if !self.interval_secs.is_finite() {
            return f32::INFINITY;
        }
        let done = whole_intervals(self.elapsed_secs, self.interval_secs) as f64;
        ((done + 1.0) * self.interval_secs - self.elapsed_secs).max(0.0) as f32
    }

    /// Advance by `dt` seconds. Returns how many increments happened.
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.elapsed_secs += dt.max(0.0) as f64;
        let steps = whole_intervals(self.elapsed_secs, self.interval_secs);
        let target = (self.base as u64 + steps).min(u32::MAX as u64) as u32;
        let raised = target - self.difficulty;
        if raised > 0 {
            self.difficulty = target;
            info!("Difficulty raised to {}", self.difficulty);
        }
        raised
    }
}
