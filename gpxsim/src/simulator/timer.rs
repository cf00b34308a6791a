//! Periodic timer state.
//!
//! The simulator only records whether its timer is armed and at what period.
//! Something else (the [`SimulatorService`](super::SimulatorService) or the
//! caller's own loop) does the actual waiting and calls
//! [`TrackSimulator::tick`](super::TrackSimulator::tick).

use std::time::Duration;

/// Armed/stopped state of the tick timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTimer {
    interval: Duration,
    active: bool,
}

impl PeriodicTimer {
    /// A stopped timer with the given period.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: false,
        }
    }

    /// Arm the timer with a new period.
    pub fn start_with(&mut self, interval: Duration) {
        self.interval = interval;
        self.active = true;
    }

    /// Re-arm the timer with its current period.
    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
