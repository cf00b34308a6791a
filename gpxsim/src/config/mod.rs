//! User configuration file (`~/.gpxsim/config.ini`).
//!
//! Settings structs live in [`settings`], constants in [`defaults`], parsing
//! in `parser` and serialization in `writer`.
//!
//! # Example
//!
//! ```ignore
//! use gpxsim::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let simulator_config = config.simulator.to_simulator_config()?;
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_LOG_FILE, DEFAULT_TICK_INTERVAL_MS};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, SimulatorSettings};
