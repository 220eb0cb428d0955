//! Storage abstraction layer for the door document.
//!
//! The entire persisted state is a single JSON object (the [`Document`]) whose keys are
//! collection names. The [`DocumentStore`] trait defines whole-document persistence:
//! implementations only need to read and write the full document, and the trait
//! provides the keyed `load`/`save` operations on top.
//!
//! # Architecture
//!
//! The storage layer is responsible for:
//! - Reading and writing the complete document
//! - Never exposing a partially written document to readers
//! - Degrading read failures into empty defaults
//!
//! The storage layer is NOT responsible for:
//! - Door semantics (id assignment, default status, merging)
//! - Cross-call serialization of read-modify-write cycles
//!
//! # Example Usage
//!
//! ```rust
//! use doorstore::storage::{DocumentStore, InMemoryStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//!
//! // A missing collection loads as its empty default
//! assert_eq!(store.load(Some("doors")).await, json!([]));
//!
//! // Save replaces one key and keeps the rest of the document
//! store.try_save("doors", json!([{"id": "1", "name": "Front"}])).await?;
//! let doors = store.load(Some("doors")).await;
//! assert_eq!(doors[0]["name"], "Front");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod file;
pub mod in_memory;

pub use errors::StoreError;
pub use file::JsonFileStore;
pub use in_memory::InMemoryStore;

use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use std::future::Future;

/// The whole persisted state: collection name to collection value.
pub type Document = Map<String, Value>;

/// Collection key holding the doors.
pub const DOORS_KEY: &str = "doors";

/// Empty value returned for a collection that could not be loaded.
///
/// The `doors` collection is a sequence, every other key defaults to an object.
pub fn default_for(key: Option<&str>) -> Value {
    match key {
        Some(DOORS_KEY) => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    }
}

/// Serialize a document with stable, human-readable formatting.
///
/// Keys keep their document order and nesting is indented by two spaces, so
/// serializing a reloaded document reproduces the same bytes.
pub fn serialize_document(document: &Document) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse a serialized document. Anything other than a JSON object is rejected.
pub fn parse_document(bytes: &[u8]) -> Result<Document, StoreError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::InvalidDocument {
            message: format!("expected a JSON object at the top level, found {}", value_kind(&other)),
        }),
    }
}

/// Human-readable name of a JSON value's type, with article.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Whole-document persistence.
///
/// Implementors provide [`read_document`](Self::read_document) and
/// [`write_document`](Self::write_document). A write must be atomic with respect to
/// concurrent reads: a reader sees either the previous or the new document.
///
/// Overlapping `save` calls are last-writer-wins at whole-document granularity. Callers
/// that need read-modify-write atomicity must serialize around the store themselves.
pub trait DocumentStore: Send + Sync {
    /// Read and parse the complete document.
    fn read_document(&self) -> impl Future<Output = Result<Document, StoreError>> + Send;

    /// Replace the complete document.
    fn write_document(
        &self,
        document: &Document,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Load one collection, or the whole document when `key` is `None`.
    ///
    /// Never fails: a missing file, malformed content or I/O error is logged and the
    /// empty default from [`default_for`] is returned instead. A key absent from an
    /// otherwise valid document also yields its default.
    fn load(&self, key: Option<&str>) -> impl Future<Output = Value> + Send {
        async move {
            match self.read_document().await {
                Ok(mut document) => match key {
                    Some(key) => document.remove(key).unwrap_or_else(|| default_for(Some(key))),
                    None => Value::Object(document),
                },
                Err(e) if e.is_missing() => {
                    info!("No document found, using empty default: {}", e);
                    default_for(key)
                }
                Err(e) => {
                    warn!("Error loading data, using empty default: {}", e);
                    default_for(key)
                }
            }
        }
    }

    /// Replace the values of several keys in one write.
    ///
    /// The current document is loaded defensively, so a corrupt document is replaced
    /// by one holding only the new entries.
    fn try_save_all(
        &self,
        entries: Vec<(String, Value)>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        async move {
            let mut document = match self.load(None).await {
                Value::Object(document) => document,
                _ => Document::new(),
            };
            let keys: Vec<String> = entries.iter().map(|(key, _)| key.clone()).collect();
            for (key, value) in entries {
                document.insert(key, value);
            }
            self.write_document(&document).await?;
            debug!("Saved document keys {:?}", keys);
            Ok(())
        }
    }

    /// Replace `document[key]` with `value` and write the document back.
    ///
    /// Returns the value that was written.
    fn try_save(
        &self,
        key: &str,
        value: Value,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send {
        async move {
            self.try_save_all(vec![(key.to_string(), value.clone())])
                .await?;
            Ok(value)
        }
    }

    /// Like [`try_save`](Self::try_save), but absorbs failures.
    ///
    /// On error the failure is logged and the empty default for `key` is returned, so
    /// a failed save cannot be told apart from saving an empty collection.
    fn save(&self, key: &str, value: Value) -> impl Future<Output = Value> + Send {
        async move {
            match self.try_save(key, value).await {
                Ok(value) => value,
                Err(e) => {
                    error!("Error saving data for key '{}': {}", key, e);
                    default_for(Some(key))
                }
            }
        }
    }
}
