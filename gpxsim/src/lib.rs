//! gpxsim - GPS track simulator
//!
//! Replays a recorded GPX track log as a live stream of position and heading
//! updates, for exercising location-aware software without moving.
//!
//! # High-Level API
//!
//! ```ignore
//! use gpxsim::simulator::{SimulatorConfig, SimulatorService, TrackSimulator};
//! use tokio_util::sync::CancellationToken;
//!
//! let simulator = TrackSimulator::new(SimulatorConfig::default());
//! let (handle, _task) = SimulatorService::spawn(simulator, CancellationToken::new());
//!
//! let mut updates = handle.subscribe();
//! handle.set_source("ride.gpx").await?;
//! handle.start().await?;
//! ```

pub mod config;
pub mod geo;
pub mod logging;
pub mod simulator;
pub mod track;

/// Version of the gpxsim library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
