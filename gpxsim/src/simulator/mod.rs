//! GPS track simulation.
//!
//! Replays a buffered GPX track log as a timed sequence of position and
//! heading updates. Simulated time advances by `tick_interval *
//! playback_multiplier` per tick; when it passes the end of the current
//! segment the [`InterpolationWindow`] slides forward one point, and at the
//! end of the log playback loops back to the first point.
//!
//! # Components
//!
//! - [`TrackSimulator`]: synchronous core. Owns the source, cursor, window
//!   and clock; one [`tick`](TrackSimulator::tick) per timer period.
//! - [`SimulatorService`]: drives a simulator on a Tokio task and broadcasts
//!   each [`PositionUpdate`] through a [`SimulatorHandle`].
//! - [`SimulatorConfig`]: validated tick interval and playback multiplier.
//!
//! # Example
//!
//! ```ignore
//! use gpxsim::simulator::{SimulatorConfig, TrackSimulator};
//!
//! let mut simulator = TrackSimulator::new(SimulatorConfig::default());
//! simulator.set_source("ride.gpx")?;
//! simulator.start()?;
//! let update = simulator.tick();
//! ```

mod clock;
mod config;
mod engine;
mod error;
mod service;
mod timer;
mod update;
mod window;

pub use clock::SimulationClock;
pub use config::{SimulatorConfig, DEFAULT_PLAYBACK_MULTIPLIER, DEFAULT_TICK_INTERVAL};
pub use engine::{SimulationState, SimulatorStatus, TrackSimulator};
pub use error::{SimulatorError, SimulatorResult};
pub use service::{SimulatorHandle, SimulatorService, DEFAULT_UPDATE_CHANNEL_CAPACITY};
pub use timer::PeriodicTimer;
pub use update::PositionUpdate;
pub use window::{InterpolationWindow, SegmentPhase};

pub(crate) use config::{validate_playback_multiplier, validate_tick_interval};
