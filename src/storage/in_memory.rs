//! In-memory document storage.
//!
//! Thread-safe [`DocumentStore`] that keeps the document in memory. It is used in
//! tests and benchmarks in place of the file store, and can be told to fail reads or
//! writes to exercise the error paths of the layers above it.
//!
//! # Example Usage
//!
//! ```rust
//! use doorstore::storage::{DocumentStore, InMemoryStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! store.fail_reads(true);
//! assert_eq!(store.load(Some("doors")).await, json!([]));
//! # Ok(())
//! # }
//! ```

use crate::storage::{Document, DocumentStore, StoreError};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Thread-safe in-memory document store.
///
/// A store that has never been written behaves like a missing file.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    document: Arc<RwLock<Option<Document>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `document`.
    pub fn with_document(document: Document) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(document))),
            ..Self::default()
        }
    }

    /// Create a store holding `{"doors": doors}`.
    pub fn with_doors(doors: Value) -> Self {
        let mut document = Document::new();
        document.insert(crate::storage::DOORS_KEY.to_string(), doors);
        Self::with_document(document)
    }

    /// Make subsequent reads fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// A copy of the current document, if one has been written.
    pub async fn snapshot(&self) -> Option<Document> {
        self.document.read().await.clone()
    }
}

impl DocumentStore for InMemoryStore {
    async fn read_document(&self) -> Result<Document, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("reads disabled"));
        }
        match self.document.read().await.as_ref() {
            Some(document) => Ok(document.clone()),
            None => Err(StoreError::io(
                "<memory>",
                std::io::Error::new(std::io::ErrorKind::NotFound, "no document written"),
            )),
        }
    }

    async fn write_document(&self, document: &Document) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("writes disabled"));
        }
        *self.document.write().await = Some(document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
