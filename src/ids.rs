//! Door id assignment.
//!
//! Ids are opaque strings. Two strategies exist:
//!
//! * [`IdStrategy::Counter`] keeps the last issued id in the document under
//!   [`SEQUENCES_KEY`], so an id is never handed out twice even after deletions.
//! * [`IdStrategy::CollectionLength`] uses `collection length + 1`. After a delete this
//!   can reissue an id that is still in use; it exists for compatibility with documents
//!   written by older deployments that expect it.

use crate::door::entry_id;
use crate::error::{DoorError, DoorResult};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Document key holding per-collection id counters.
pub const SEQUENCES_KEY: &str = "sequences";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// Persisted monotonic counter
    #[default]
    Counter,
    /// `collection length + 1`
    CollectionLength,
}

impl IdStrategy {
    /// Whether this strategy stores state under [`SEQUENCES_KEY`].
    pub fn is_persisted(&self) -> bool {
        matches!(self, IdStrategy::Counter)
    }

    /// Pick the id for a door appended to `entries`.
    ///
    /// For [`IdStrategy::Counter`], `sequences` is updated in place with the issued
    /// value under `collection`. A missing or stale counter is seeded from the larger of
    /// the collection length and the largest numeric id, so existing documents continue
    /// without collisions. Fails when the counter has no value left to issue.
    pub fn next_id(
        &self,
        collection: &str,
        entries: &[Value],
        sequences: &mut Map<String, Value>,
    ) -> DoorResult<String> {
        match self {
            IdStrategy::CollectionLength => Ok((entries.len() + 1).to_string()),
            IdStrategy::Counter => {
                let last = sequences
                    .get(collection)
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                let next = last
                    .max(largest_numeric_id(entries))
                    .max(entries.len() as u64)
                    .checked_add(1)
                    .ok_or_else(|| {
                        DoorError::internal(format!("id counter for '{}' is exhausted", collection))
                    })?;
                sequences.insert(collection.to_string(), Value::from(next));
                Ok(next.to_string())
            }
        }
    }
}

/// Largest id among `entries` that parses as an unsigned integer, or 0.
pub fn largest_numeric_id(entries: &[Value]) -> u64 {
    entries
        .iter()
        .filter_map(|entry| entry_id(entry)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Counter => write!(f, "counter"),
            IdStrategy::CollectionLength => write!(f, "length"),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "counter" => Ok(IdStrategy::Counter),
            "length" => Ok(IdStrategy::CollectionLength),
            other => Err(format!(
                "unknown id strategy '{}', expected 'counter' or 'length'",
                other
            )),
        }
    }
}
