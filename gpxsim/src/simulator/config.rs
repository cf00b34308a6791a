//! Simulator configuration.

use std::time::Duration;

use super::error::{SimulatorError, SimulatorResult};

/// Default real-time interval between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Default playback speed (real time).
pub const DEFAULT_PLAYBACK_MULTIPLIER: u32 = 1;

/// Tick cadence and playback speed.
///
/// `tick_interval` is how often updates are produced in real time;
/// `playback_multiplier` scales how much simulated time passes per tick.
/// A 500 ms tick with multiplier 2 advances the track by one second per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    tick_interval: Duration,
    playback_multiplier: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            playback_multiplier: DEFAULT_PLAYBACK_MULTIPLIER,
        }
    }
}

impl SimulatorConfig {
    /// Create a validated configuration.
    pub fn new(tick_interval: Duration, playback_multiplier: u32) -> SimulatorResult<Self> {
        Self::default()
            .with_tick_interval(tick_interval)?
            .with_playback_multiplier(playback_multiplier)
    }

    /// Set the tick interval. Must be at least one millisecond.
    pub fn with_tick_interval(mut self, interval: Duration) -> SimulatorResult<Self> {
        validate_tick_interval(interval)?;
        self.tick_interval = interval;
        Ok(self)
    }

    /// Set the playback multiplier. Must be at least 1.
    pub fn with_playback_multiplier(mut self, multiplier: u32) -> SimulatorResult<Self> {
        validate_playback_multiplier(multiplier)?;
        self.playback_multiplier = multiplier;
        Ok(self)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn playback_multiplier(&self) -> u32 {
        self.playback_multiplier
    }

    /// Simulated milliseconds that pass per tick.
    pub fn step_millis(&self) -> i64 {
        self.tick_interval.as_millis() as i64 * i64::from(self.playback_multiplier)
    }
}

pub(crate) fn validate_tick_interval(interval: Duration) -> SimulatorResult<()> {
    if interval.as_millis() == 0 {
        return Err(SimulatorError::InvalidConfig(format!(
            "tick interval must be at least 1ms, got {:?}",
            interval
        )));
    }
    Ok(())
}

pub(crate) fn validate_playback_multiplier(multiplier: u32) -> SimulatorResult<()> {
    if multiplier == 0 {
        return Err(SimulatorError::InvalidConfig(
            "playback multiplier must be at least 1".to_string(),
        ));
    }
    Ok(())
}
