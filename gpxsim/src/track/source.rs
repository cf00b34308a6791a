//! In-memory track log buffer.
//!
//! The log is read from disk exactly once. Every pass over the track (the first
//! one and each loop restart) parses the same shared buffer.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;

use super::cursor::TrackCursor;

/// Errors loading a track log from disk.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The path does not exist.
    #[error("Track log not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path exists but could not be read.
    #[error("Failed to read track log {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A fully buffered track log.
#[derive(Debug, Clone)]
pub struct TrackSource {
    path: PathBuf,
    data: Bytes,
}

impl TrackSource {
    /// Read the whole file at `path` into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        let data = std::fs::read(path).map_err(|source| SourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "Track log buffered");

        Ok(Self {
            path: path.to_path_buf(),
            data: Bytes::from(data),
        })
    }

    /// Build a source from bytes already in memory.
    pub fn from_bytes(path: impl Into<PathBuf>, data: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    /// Path the log was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the buffered log in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Start a new parse over the buffered content.
    pub fn cursor(&self) -> TrackCursor {
        TrackCursor::new(self.data.clone())
    }
}
