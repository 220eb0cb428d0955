//! Error types for door operations.
//!
//! Storage failures live in [`crate::storage::StoreError`]; this module covers the
//! errors a [`DoorHandler`](crate::handler::DoorHandler) can return. A missing door is
//! not an error at all: it is reported through [`Outcome::NotFound`](crate::outcome::Outcome).

use crate::storage::StoreError;

/// Main error type for door operations.
#[derive(Debug, thiserror::Error)]
pub enum DoorError {
    /// The client payload does not describe a valid door
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The backing store could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal errors that do not fit another category
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DoorError {
    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the client rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DoorError::Validation(_))
    }
}

/// Validation errors for door payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The request body was not a JSON object
    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// The request body could not be parsed as JSON
    #[error("Malformed JSON body: {message}")]
    MalformedJson { message: String },

    /// A required field is missing
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    /// A field has the wrong JSON type
    #[error("Field '{field}' has invalid type, expected {expected}")]
    InvalidFieldType { field: String, expected: String },
}

impl ValidationError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_type(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidFieldType {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

/// Result type for door operations.
pub type DoorResult<T> = Result<T, DoorError>;
