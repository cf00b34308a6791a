//! Simulated time.

use chrono::NaiveTime;

use super::config::SimulatorConfig;
use crate::track::time_from_millis;

/// Simulated time of day, advanced a fixed step per tick.
///
/// Time is kept as milliseconds since midnight of the first track point and
/// does not wrap, so it only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    current_millis: i64,
    tick_interval_ms: i64,
    playback_multiplier: u32,
}

impl SimulationClock {
    /// Create a clock at `start_millis` stepping per `config`.
    pub fn new(start_millis: i64, config: &SimulatorConfig) -> Self {
        Self {
            current_millis: start_millis,
            tick_interval_ms: config.tick_interval().as_millis() as i64,
            playback_multiplier: config.playback_multiplier(),
        }
    }

    /// Move forward one tick and return the new time.
    pub fn advance(&mut self) -> i64 {
        self.current_millis += self.step_millis();
        self.current_millis
    }

    /// Jump to `millis` (used when the track loops).
    pub fn reset_to(&mut self, millis: i64) {
        self.current_millis = millis;
    }

    pub fn current_millis(&self) -> i64 {
        self.current_millis
    }

    /// Current time as a time of day.
    pub fn current_time(&self) -> NaiveTime {
        time_from_millis(self.current_millis)
    }

    /// Simulated milliseconds per tick.
    pub fn step_millis(&self) -> i64 {
        self.tick_interval_ms * i64::from(self.playback_multiplier)
    }

    pub fn playback_multiplier(&self) -> u32 {
        self.playback_multiplier
    }

    pub fn tick_interval_ms(&self) -> i64 {
        self.tick_interval_ms
    }
}
