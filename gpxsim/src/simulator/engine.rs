//! The track simulator.
//!
//! [`TrackSimulator`] replays a buffered GPX log as a stream of
//! [`PositionUpdate`]s, one per call to [`TrackSimulator::tick`]. It owns all
//! of its state and needs `&mut self` for every change, so ticks and
//! configuration calls can never interleave.
//!
//! # Tick algorithm
//!
//! 1. Advance the clock by `tick_interval * playback_multiplier`.
//! 2. If the clock passed the end of the current segment, slide the window
//!    one point. At the end of the log, rewind and rebuild the window instead,
//!    and emit nothing this tick.
//! 3. Report the segment start point until the segment's midpoint, then its
//!    end point, with the segment's heading.
//!
//! # Example
//!
//! ```ignore
//! let mut simulator = TrackSimulator::new(SimulatorConfig::default());
//! simulator.set_source("ride.gpx")?;
//! simulator.start()?;
//!
//! while simulator.is_active() {
//!     std::thread::sleep(simulator.tick_interval());
//!     if let Some(update) = simulator.tick() {
//!         println!("{}", update);
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::clock::SimulationClock;
use super::config::SimulatorConfig;
use super::error::{SimulatorError, SimulatorResult};
use super::timer::PeriodicTimer;
use super::update::PositionUpdate;
use super::window::{InterpolationWindow, SegmentPhase};
use crate::track::{TrackCursor, TrackSource};

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TickOutcome {
    /// A regular position update.
    Update(PositionUpdate),
    /// The log ended and playback restarted from the first point.
    Restarted,
    /// The log ended and could not be restarted.
    Stalled,
}

/// Window and clock of a running simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    window: InterpolationWindow,
    clock: SimulationClock,
}

impl SimulationState {
    fn new(window: InterpolationWindow, config: &SimulatorConfig) -> Self {
        Self {
            clock: SimulationClock::new(window.segment_start(), config),
            window,
        }
    }

    pub fn window(&self) -> &InterpolationWindow {
        &self.window
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    fn tick(&mut self, cursor: &mut TrackCursor) -> TickOutcome {
        let now = self.clock.advance();

        if now > self.window.segment_end() && !self.window.advance(cursor) {
            cursor.rewind();
            return match InterpolationWindow::initialize(cursor) {
                Ok(window) => {
                    self.clock.reset_to(window.segment_start());
                    self.window = window;
                    TickOutcome::Restarted
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Track log could not be restarted");
                    TickOutcome::Stalled
                }
            };
        }

        let normalized_time = self.window.normalized_time(now);

        TickOutcome::Update(PositionUpdate {
            position: self.window.position_at(normalized_time),
            heading: self.window.heading_at(normalized_time),
            sim_time_ms: now,
            normalized_time,
            phase: SegmentPhase::from_normalized(normalized_time),
        })
    }
}

/// Point-in-time view of the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorStatus {
    /// Path of the current track log.
    pub source: Option<PathBuf>,
    /// Whether `start()` has succeeded since the log was set.
    pub started: bool,
    /// Whether the tick timer is armed.
    pub active: bool,
    pub tick_interval: Duration,
    pub playback_multiplier: u32,
    /// Current simulated time, once started.
    pub sim_time_ms: Option<i64>,
    /// Times the log has wrapped around.
    pub loops_completed: u64,
}

/// GPS track simulator.
#[derive(Debug)]
pub struct TrackSimulator {
    config: SimulatorConfig,
    source: Option<TrackSource>,
    cursor: Option<TrackCursor>,
    state: Option<SimulationState>,
    timer: PeriodicTimer,
    started: bool,
    loops_completed: u64,
}

impl Default for TrackSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl TrackSimulator {
    /// Create a simulator with no track log.
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            timer: PeriodicTimer::new(config.tick_interval()),
            config,
            source: None,
            cursor: None,
            state: None,
            started: false,
            loops_completed: 0,
        }
    }

    /// Load and buffer a track log from disk.
    ///
    /// On success the simulation is reset: the timer stops, the window is
    /// dropped and [`is_started`](Self::is_started) becomes false. On failure
    /// nothing changes.
    pub fn set_source(&mut self, path: impl AsRef<Path>) -> SimulatorResult<()> {
        let source = TrackSource::load(path).map_err(|e| {
            tracing::warn!(error = %e, "Track log rejected");
            SimulatorError::from(e)
        })?;
        self.set_track(source);
        Ok(())
    }

    /// Use an already buffered track log. Resets like [`set_source`](Self::set_source).
    pub fn set_track(&mut self, source: TrackSource) {
        tracing::info!(
            path = %source.path().display(),
            bytes = source.len(),
            "Track log loaded"
        );

        self.cursor = Some(source.cursor());
        self.source = Some(source);
        self.state = None;
        self.timer.stop();
        self.started = false;
        self.loops_completed = 0;
    }

    /// Path of the current track log.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_ref().map(|s| s.path())
    }

    /// Build the window from the first three points and arm the timer.
    ///
    /// Playback always begins at the start of the log. With fewer than three
    /// usable points this fails with [`SimulatorError::InsufficientData`] and
    /// the timer stays stopped.
    pub fn start(&mut self) -> SimulatorResult<()> {
        let cursor = self.cursor.as_mut().ok_or(SimulatorError::NoSource)?;
        cursor.rewind();

        let window = InterpolationWindow::initialize(cursor).map_err(|e| {
            tracing::warn!(error = %e, "Simulation not started");
            e
        })?;

        self.state = Some(SimulationState::new(window, &self.config));
        self.timer.start_with(self.config.tick_interval());
        self.started = true;

        tracing::info!(
            tick_ms = self.config.tick_interval().as_millis() as u64,
            multiplier = self.config.playback_multiplier(),
            "Simulation started"
        );
        Ok(())
    }

    /// Stop ticking. Window and clock are kept as they are.
    pub fn pause(&mut self) {
        self.timer.stop();
        tracing::debug!("Simulation paused");
    }

    /// Re-arm the timer after [`pause`](Self::pause).
    ///
    /// Does nothing if the simulation was never started.
    pub fn resume(&mut self) {
        if self.state.is_none() {
            tracing::debug!("Resume ignored, simulation not started");
            return;
        }
        self.timer.start();
        tracing::debug!("Simulation resumed");
    }

    /// Whether the tick timer is armed.
    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Whether `start()` has succeeded since the track log was set.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Period of the armed timer.
    pub fn timer_interval(&self) -> Duration {
        self.timer.interval()
    }

    /// Configured tick interval.
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    /// Change the tick interval. Takes effect at the next `start()`.
    pub fn set_tick_interval(&mut self, interval: Duration) -> SimulatorResult<()> {
        self.config = self.config.with_tick_interval(interval)?;
        Ok(())
    }

    pub fn playback_multiplier(&self) -> u32 {
        self.config.playback_multiplier()
    }

    /// Change the playback multiplier. Takes effect at the next `start()`.
    pub fn set_playback_multiplier(&mut self, multiplier: u32) -> SimulatorResult<()> {
        self.config = self.config.with_playback_multiplier(multiplier)?;
        Ok(())
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Window and clock, once started.
    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    pub fn window(&self) -> Option<&InterpolationWindow> {
        self.state.as_ref().map(|s| &s.window)
    }

    pub fn clock(&self) -> Option<&SimulationClock> {
        self.state.as_ref().map(|s| &s.clock)
    }

    /// Times the log has wrapped around since it was set.
    pub fn loops_completed(&self) -> u64 {
        self.loops_completed
    }

    pub fn status(&self) -> SimulatorStatus {
        SimulatorStatus {
            source: self.source_path().map(Path::to_path_buf),
            started: self.started,
            active: self.is_active(),
            tick_interval: self.config.tick_interval(),
            playback_multiplier: self.config.playback_multiplier(),
            sim_time_ms: self.clock().map(SimulationClock::current_millis),
            loops_completed: self.loops_completed,
        }
    }

    /// Run one timer tick.
    ///
    /// Returns `None` while the timer is stopped (before `start()` or after
    /// `pause()`) and on the tick that wraps the log around to its first
    /// point. A stopped timer leaves the clock and window untouched.
    pub fn tick(&mut self) -> Option<PositionUpdate> {
        if !self.timer.is_active() {
            return None;
        }
        let (Some(state), Some(cursor)) = (self.state.as_mut(), self.cursor.as_mut()) else {
            return None;
        };

        match state.tick(cursor) {
            TickOutcome::Update(update) => Some(update),
            TickOutcome::Restarted => {
                self.loops_completed += 1;
                tracing::debug!(loops = self.loops_completed, "End of track log, looping");
                None
            }
            TickOutcome::Stalled => {
                self.timer.stop();
                None
            }
        }
    }
}
