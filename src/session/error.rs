//! Error types for session discovery and loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the session pipeline.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session matched the request.
    #[error("{0}")]
    NotFound(String),

    /// A line is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A line is valid JSON but not a transcript record.
    #[error("not a transcript record: {0}")]
    InvalidFormat(String),

    /// A filesystem operation failed.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for the session pipeline.
pub type Result<T> = std::result::Result<T, SessionError>;
