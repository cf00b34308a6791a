//! Settings structs, one per `[section]` of the INI file.

use std::path::PathBuf;
use std::time::Duration;

use crate::simulator::{SimulatorConfig, SimulatorResult};

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Simulator settings
    pub simulator: SimulatorSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[simulator]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorSettings {
    /// Track log played when no source is given on the command line
    pub source: Option<PathBuf>,
    /// Real-time interval between ticks
    pub tick_interval_ms: u64,
    /// Simulated time per tick, as a multiple of the tick interval
    pub playback_multiplier: u32,
}

impl SimulatorSettings {
    /// Build a validated [`SimulatorConfig`].
    pub fn to_simulator_config(&self) -> SimulatorResult<SimulatorConfig> {
        SimulatorConfig::new(
            Duration::from_millis(self.tick_interval_ms),
            self.playback_multiplier,
        )
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
