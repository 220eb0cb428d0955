//! File-backed document storage.
//!
//! The document lives in a single pretty-printed JSON file. Every write goes to a
//! uniquely named temporary file in the same directory, which is flushed and then
//! renamed over the target, so readers observe either the old or the new document.
//!
//! ```rust,no_run
//! use doorstore::storage::{DocumentStore, JsonFileStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonFileStore::new("db.json");
//! store.try_save("doors", json!([])).await?;
//! let doors = store.load(Some("doors")).await;
//! # Ok(())
//! # }
//! ```

use crate::storage::{Document, DocumentStore, StoreError, parse_document, serialize_document};
use log::{debug, trace};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Document store backed by one JSON file.
///
/// Cloning is cheap and clones share the same in-process lock, which keeps
/// individual reads and writes from interleaving.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl JsonFileStore {
    /// Create a store for the file at `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
    }

    async fn write_temp(&self, temp: &Path, contents: &[u8]) -> Result<(), StoreError> {
        let mut file = tokio::fs::File::create(temp)
            .await
            .map_err(|e| StoreError::io(temp, e))?;
        file.write_all(contents)
            .await
            .map_err(|e| StoreError::io(temp, e))?;
        file.sync_all().await.map_err(|e| StoreError::io(temp, e))?;
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    async fn read_document(&self) -> Result<Document, StoreError> {
        let _guard = self.lock.read().await;
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        trace!("Read {} bytes from {}", bytes.len(), self.path.display());
        parse_document(&bytes)
    }

    async fn write_document(&self, document: &Document) -> Result<(), StoreError> {
        let contents = serialize_document(document)?;
        let temp = self.temp_path();

        let _guard = self.lock.write().await;
        if let Err(e) = self.write_temp(&temp, contents.as_bytes()).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StoreError::io(&self.path, e));
        }

        debug!(
            "Wrote {} bytes to {}",
            contents.len(),
            self.path.display()
        );
        Ok(())
    }
}
