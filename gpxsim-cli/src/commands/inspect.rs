//! Inspect command - summarize a track log.

use std::path::Path;

use gpxsim::simulator::SimulatorError;
use gpxsim::track::{summarize, TrackSource};

use crate::error::CliError;

/// Run the inspect command.
pub fn run(source: &Path) -> Result<(), CliError> {
    let track = TrackSource::load(source).map_err(SimulatorError::from)?;
    let summary = summarize(&track);

    println!("Track log: {} ({} bytes)", track.path().display(), track.len());
    println!("{}", summary);
    if let Some(duration) = summary.duration() {
        println!("Duration:    {}s", duration.num_seconds());
    }

    if !summary.is_simulatable() {
        println!();
        println!("This log cannot be played: at least 3 distinct points are required.");
    }
    Ok(())
}
