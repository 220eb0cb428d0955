//! Storage-specific error types.
//!
//! These errors describe failures to read or write the backing document and carry no
//! knowledge of doors.

use std::path::PathBuf;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read, written or renamed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document parsed, but is not a mapping of collection names.
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    /// The storage backend is unavailable.
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Whether the error only means the document does not exist yet.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            StoreError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
