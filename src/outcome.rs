//! Typed results of door operations.
//!
//! A missing door or a stale version are expected results, not errors, so they are
//! variants of [`Outcome`] rather than of [`DoorError`](crate::error::DoorError).

use crate::version::VersionConflict;

/// Result of a door operation that completed without a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation succeeded and produced `T`
    Success(T),

    /// A new door was created
    Created(T),

    /// No door has the requested id
    NotFound,

    /// The door exists but no longer matches the version the caller expected
    VersionMismatch(VersionConflict),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_) | Outcome::Created(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }

    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, Outcome::VersionMismatch(_))
    }

    /// Extract the produced value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Success(value) | Outcome::Created(value) => Some(value),
            _ => None,
        }
    }
}
