//! Simulator error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::track::SourceError;

/// Result type for simulator operations.
pub type SimulatorResult<T> = Result<T, SimulatorError>;

/// Errors reported by the simulator.
///
/// Every variant is recoverable: the simulator keeps its previous state and
/// the caller may retry with different input.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// The track log path does not exist.
    #[error("Track log not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The track log exists but could not be read.
    #[error("Failed to read track log {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `start()` was called before a track log was set.
    #[error("No track log has been set")]
    NoSource,

    /// The log has fewer than three usable points.
    #[error("Track log has {found} usable point(s), at least 3 are required")]
    InsufficientData { found: usize },

    /// A configuration value is out of range.
    #[error("Invalid simulator configuration: {0}")]
    InvalidConfig(String),

    /// The simulator service task is no longer running.
    #[error("Simulator service has stopped")]
    ServiceStopped,
}

impl From<SourceError> for SimulatorError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::NotFound(path) => SimulatorError::SourceNotFound(path),
            SourceError::Unreadable { path, source } => {
                SimulatorError::SourceUnreadable { path, source }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source_not_found() {
        let err: SimulatorError = SourceError::NotFound(PathBuf::from("missing.gpx")).into();
        assert!(matches!(err, SimulatorError::SourceNotFound(ref p) if p.ends_with("missing.gpx")));
        assert!(err.to_string().contains("missing.gpx"));
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = SimulatorError::InsufficientData { found: 2 };
        assert_eq!(
            err.to_string(),
            "Track log has 2 usable point(s), at least 3 are required"
        );
    }

    #[test]
    fn test_unreadable_keeps_source() {
        use std::error::Error;

        let err: SimulatorError = SourceError::Unreadable {
            path: PathBuf::from("/tmp/track.gpx"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();

        assert!(err.source().is_some());
    }
}
