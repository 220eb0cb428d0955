//! Integrity checks for a stored document.
//!
//! The server tolerates a lot when reading (missing file, wrong shapes), so problems
//! in a hand-edited document can go unnoticed until a door cannot be found or a write
//! refuses to proceed. This module inspects a document and reports everything that
//! breaks the door invariants: every entry is a door with a unique non-empty id, and
//! the id counter is neither behind the ids in use nor exhausted.

use crate::door::Door;
use crate::ids::SEQUENCES_KEY;
use crate::storage::{DOORS_KEY, Document, value_kind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Severity of an integrity issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueSeverity {
    /// Harmless, but worth fixing
    Warning,
    /// Writes will fail, ids may collide, or doors are unreachable
    Error,
}

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntegrityIssue {
    /// The document has no `doors` key
    MissingCollection,
    /// `doors` is not an array
    CollectionNotArray { found: String },
    /// An entry cannot be read as a door
    InvalidEntry { index: usize, message: String },
    /// A door has an empty id
    EmptyId { index: usize },
    /// Two doors share an id
    DuplicateId { id: String, index: usize },
    /// The stored counter would reissue an id that is in use
    StaleCounter { counter: u64, largest_id: u64 },
    /// No id is left to issue, so every create will fail
    CounterExhausted,
}

impl IntegrityIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            IntegrityIssue::MissingCollection => IssueSeverity::Warning,
            _ => IssueSeverity::Error,
        }
    }
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::MissingCollection => write!(f, "no '{}' collection", DOORS_KEY),
            IntegrityIssue::CollectionNotArray { found } => {
                write!(f, "'{}' is {} instead of an array", DOORS_KEY, found)
            }
            IntegrityIssue::InvalidEntry { index, message } => {
                write!(f, "entry {} is not a valid door: {}", index, message)
            }
            IntegrityIssue::EmptyId { index } => write!(f, "entry {} has an empty id", index),
            IntegrityIssue::DuplicateId { id, index } => {
                write!(f, "entry {} reuses id '{}'", index, id)
            }
            IntegrityIssue::StaleCounter {
                counter,
                largest_id,
            } => write!(
                f,
                "id counter {} is behind the largest id in use ({})",
                counter, largest_id
            ),
            IntegrityIssue::CounterExhausted => {
                write!(f, "no id is left to issue after {}", u64::MAX)
            }
        }
    }
}

/// Result of checking a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub door_count: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Whether the document has no error-level issues.
    pub fn is_valid(&self) -> bool {
        self.issues
            .iter()
            .all(|issue| issue.severity() < IssueSeverity::Error)
    }
}

/// Check `document` against the door invariants.
pub fn check_document(document: &Document) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    let entries = match document.get(DOORS_KEY) {
        None => {
            report.issues.push(IntegrityIssue::MissingCollection);
            return report;
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            report.issues.push(IntegrityIssue::CollectionNotArray {
                found: value_kind(other).to_string(),
            });
            return report;
        }
    };

    let mut seen = HashSet::new();
    let mut largest_id = 0;
    for (index, entry) in entries.iter().enumerate() {
        let door: Door = match serde_json::from_value(entry.clone()) {
            Ok(door) => door,
            Err(e) => {
                report.issues.push(IntegrityIssue::InvalidEntry {
                    index,
                    message: e.to_string(),
                });
                continue;
            }
        };
        report.door_count += 1;

        if door.id().is_empty() {
            report.issues.push(IntegrityIssue::EmptyId { index });
            continue;
        }
        if let Ok(numeric) = door.id().parse::<u64>() {
            largest_id = largest_id.max(numeric);
        }
        if !seen.insert(door.id().to_string()) {
            report.issues.push(IntegrityIssue::DuplicateId {
                id: door.id().to_string(),
                index,
            });
        }
    }

    let counter = document
        .get(SEQUENCES_KEY)
        .and_then(|sequences| sequences.get(DOORS_KEY))
        .and_then(Value::as_u64);
    if let Some(counter) = counter {
        if counter < largest_id {
            report.issues.push(IntegrityIssue::StaleCounter {
                counter,
                largest_id,
            });
        }
    }
    if counter.unwrap_or(0).max(largest_id) == u64::MAX {
        report.issues.push(IntegrityIssue::CounterExhausted);
    }

    report
}
