//! Default values for all configuration settings.

use super::file::config_directory;
use super::settings::{LoggingSettings, SimulatorSettings};
use crate::simulator::DEFAULT_PLAYBACK_MULTIPLIER;

/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "gpxsim.log";

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            source: None,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            playback_multiplier: DEFAULT_PLAYBACK_MULTIPLIER,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_directory().join("logs"),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
