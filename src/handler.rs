//! CRUD operations over the `doors` collection.
//!
//! [`DoorHandler`] turns a [`DocumentStore`] into the five door operations. Every
//! operation reads the current collection from the store; mutations compute the new
//! collection in memory and write it back in full. Doors are located by id on the
//! stored entries, and only the targeted entry is ever changed: every other entry is
//! written back exactly as it was read, whatever its shape.
//!
//! Mutations hold a per-handler lock across the whole read-modify-write cycle, so two
//! concurrent creates through the same handler cannot overwrite each other. Writers
//! outside this process are not coordinated with; for those, callers can pass the
//! door's version to [`DoorHandler::update`] and [`DoorHandler::delete`] and get
//! [`Outcome::VersionMismatch`] instead of silently overwriting a newer door.
//!
//! ```rust
//! use doorstore::handler::DoorHandler;
//! use doorstore::storage::InMemoryStore;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = DoorHandler::new(InMemoryStore::new());
//!
//! let created = handler
//!     .create(json!({"name": "Front", "description": "Main entrance"}))
//!     .await?
//!     .into_value()
//!     .unwrap();
//! assert_eq!(created.id(), "1");
//! assert_eq!(created.status(), Some("closed"));
//!
//! let opened = handler.update("1", json!({"status": "open"}), None).await?;
//! assert!(opened.into_value().unwrap().is_open());
//! # Ok(())
//! # }
//! ```

use crate::door::{Door, DoorPatch, NewDoor, entry_id};
use crate::error::DoorResult;
use crate::ids::{IdStrategy, SEQUENCES_KEY};
use crate::outcome::Outcome;
use crate::storage::{DOORS_KEY, DocumentStore, StoreError, value_kind};
use crate::version::{RawVersion, VersionConflict};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Door CRUD over a document store.
pub struct DoorHandler<S: DocumentStore> {
    store: S,
    id_strategy: IdStrategy,
    write_lock: Arc<Mutex<()>>,
}

impl<S: DocumentStore> DoorHandler<S> {
    /// Create a handler using the default id strategy.
    pub fn new(store: S) -> Self {
        Self::with_id_strategy(store, IdStrategy::default())
    }

    pub fn with_id_strategy(store: S, id_strategy: IdStrategy) -> Self {
        Self {
            store,
            id_strategy,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }

    /// All doors, in stored order, exactly as persisted.
    ///
    /// Never fails: an unreadable document yields an empty list.
    pub async fn list(&self) -> Vec<Value> {
        let doors = self.read_entries().await;
        debug!("Listed {} doors", doors.len());
        doors
    }

    /// The door with `id`, compared as a string.
    ///
    /// Other entries are not inspected, so a malformed neighbour cannot make the
    /// lookup fail.
    pub async fn get(&self, id: &str) -> DoorResult<Outcome<Door>> {
        let mut entries = self.read_entries().await;
        match position(&entries, id) {
            Some(index) => Ok(Outcome::Success(serde_json::from_value(
                entries.swap_remove(index),
            )?)),
            None => {
                debug!("Door '{}' not found", id);
                Ok(Outcome::NotFound)
            }
        }
    }

    /// Validate `payload` and append it as a new door.
    ///
    /// The id is assigned by the handler's [`IdStrategy`]; a client `id` is ignored.
    /// A missing status defaults to `"closed"`.
    pub async fn create(&self, payload: Value) -> DoorResult<Outcome<Door>> {
        let new_door = NewDoor::from_payload(payload)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.load_document().await;
        let mut entries = writable_entries(document.remove(DOORS_KEY))?;
        let mut sequences = match document.remove(SEQUENCES_KEY) {
            Some(Value::Object(sequences)) => sequences,
            _ => Map::new(),
        };

        let id = self
            .id_strategy
            .next_id(DOORS_KEY, &entries, &mut sequences)?;
        let door = new_door.into_door(id);
        entries.push(serde_json::to_value(&door)?);
        let count = entries.len();

        let mut changes = vec![(DOORS_KEY.to_string(), Value::Array(entries))];
        if self.id_strategy.is_persisted() {
            changes.push((SEQUENCES_KEY.to_string(), Value::Object(sequences)));
        }
        self.store.try_save_all(changes).await?;

        info!("Created door '{}' ({} doors stored)", door.id(), count);
        Ok(Outcome::Created(door))
    }

    /// Merge `payload` into the door with `id`.
    ///
    /// Any `id` in the payload is dropped first. When `expected` is given and the
    /// stored door has a different version, nothing is written. A payload with
    /// nothing to merge returns the door without writing.
    pub async fn update(
        &self,
        id: &str,
        payload: Value,
        expected: Option<&RawVersion>,
    ) -> DoorResult<Outcome<Door>> {
        let patch = DoorPatch::from_payload(payload)?;

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_entries().await?;
        let Some(index) = position(&entries, id) else {
            debug!("Door '{}' not found for update", id);
            return Ok(Outcome::NotFound);
        };
        let door: Door = serde_json::from_value(entries[index].clone())?;
        if let Some(conflict) = check_version(&door, expected)? {
            info!("Update of door '{}' refused: {}", id, conflict);
            return Ok(Outcome::VersionMismatch(conflict));
        }
        if patch.is_empty() {
            debug!("Update of door '{}' has nothing to merge", id);
            return Ok(Outcome::Success(door));
        }

        let merged = door.merged(patch);
        entries[index] = serde_json::to_value(&merged)?;
        self.save_entries(entries).await?;

        info!("Updated door '{}'", id);
        Ok(Outcome::Success(merged))
    }

    /// Remove the door with `id`, returning its stored value before removal.
    pub async fn delete(
        &self,
        id: &str,
        expected: Option<&RawVersion>,
    ) -> DoorResult<Outcome<Door>> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_entries().await?;
        let Some(index) = position(&entries, id) else {
            debug!("Door '{}' not found for delete", id);
            return Ok(Outcome::NotFound);
        };
        let door: Door = serde_json::from_value(entries[index].clone())?;
        if let Some(conflict) = check_version(&door, expected)? {
            info!("Delete of door '{}' refused: {}", id, conflict);
            return Ok(Outcome::VersionMismatch(conflict));
        }

        entries.remove(index);
        let remaining = entries.len();
        self.save_entries(entries).await?;

        info!("Deleted door '{}' ({} doors remain)", id, remaining);
        Ok(Outcome::Success(door))
    }

    async fn load_document(&self) -> Map<String, Value> {
        match self.store.load(None).await {
            Value::Object(document) => document,
            _ => Map::new(),
        }
    }

    /// Stored entries for reading; a collection of the wrong shape reads as empty.
    async fn read_entries(&self) -> Vec<Value> {
        match self.store.load(Some(DOORS_KEY)).await {
            Value::Array(entries) => entries,
            other => {
                warn!(
                    "Stored doors collection is {}, treating as empty",
                    value_kind(&other)
                );
                Vec::new()
            }
        }
    }

    /// Stored entries for a read-modify-write cycle.
    async fn load_entries(&self) -> DoorResult<Vec<Value>> {
        writable_entries(Some(self.store.load(Some(DOORS_KEY)).await))
    }

    async fn save_entries(&self, entries: Vec<Value>) -> DoorResult<()> {
        self.store.try_save(DOORS_KEY, Value::Array(entries)).await?;
        Ok(())
    }
}

/// Index of the first entry whose id is `id`.
fn position(entries: &[Value], id: &str) -> Option<usize> {
    entries
        .iter()
        .position(|entry| entry_id(entry).as_deref() == Some(id))
}

/// The stored collection as entries that may be rewritten.
///
/// A missing collection is empty. Any other non-array value is an error, so a write
/// can never replace data it does not understand.
fn writable_entries(value: Option<Value>) -> DoorResult<Vec<Value>> {
    match value {
        Some(Value::Array(entries)) => Ok(entries),
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(other) => Err(StoreError::InvalidDocument {
            message: format!(
                "'{}' is {} instead of an array",
                DOORS_KEY,
                value_kind(&other)
            ),
        }
        .into()),
    }
}

fn check_version(
    door: &Door,
    expected: Option<&RawVersion>,
) -> DoorResult<Option<VersionConflict>> {
    let Some(expected) = expected else {
        return Ok(None);
    };
    let current = RawVersion::of(door)?;
    if &current == expected {
        Ok(None)
    } else {
        Ok(Some(VersionConflict::new(expected.clone(), current)))
    }
}
