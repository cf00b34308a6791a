//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use gpxsim::config::ConfigFileError;
use gpxsim::simulator::SimulatorError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// No track log on the command line or in config.ini
    NoSource,
    /// Simulator rejected a request
    Simulator(SimulatorError),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// Failed to write an update to stdout
    Output(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::NoSource => {
                eprintln!();
                eprintln!("Pass a GPX file, e.g. `gpxsim run ride.gpx`, or set");
                eprintln!("`source` in the [simulator] section of config.ini.");
            }
            CliError::Simulator(SimulatorError::InsufficientData { .. }) => {
                eprintln!();
                eprintln!("Run `gpxsim inspect <file>` to see what was read from the log.");
                eprintln!("Points with the same position as the previous one are skipped.");
            }
            CliError::ConfigFile(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value in config.ini or remove it to use the default.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::NoSource => write!(f, "No track log given"),
            CliError::Simulator(e) => write!(f, "Simulation failed: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Simulator(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<SimulatorError> for CliError {
    fn from(e: SimulatorError) -> Self {
        CliError::Simulator(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_simulator_error_message() {
        let err: CliError = SimulatorError::SourceNotFound(PathBuf::from("ride.gpx")).into();
        assert_eq!(
            err.to_string(),
            "Simulation failed: Track log not found: ride.gpx"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_no_source_message() {
        assert_eq!(CliError::NoSource.to_string(), "No track log given");
    }
}
