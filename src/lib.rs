//! Door CRUD service backed by a single JSON document.
//!
//! Doors are kept in the `doors` collection of one JSON file and served over a small
//! HTTP API. The crate is layered so each part can be used and tested on its own.
//!
//! # Core Components
//!
//! - [`DocumentStore`] - whole-document persistence with defensive defaults
//! - [`JsonFileStore`] - the file-backed store (atomic write-then-rename)
//! - [`DoorHandler`] - list, get, create, update and delete over a store
//! - [`DoorOperationHandler`] - framework-agnostic status/body rendering
//! - [`http::router`] - the axum router exposing the API
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use doorstore::{DoorHandler, DoorOperationHandler, JsonFileStore, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let store = JsonFileStore::new(&config.data_path);
//! let handler = DoorHandler::with_id_strategy(store, config.id_strategy);
//! let app = doorstore::http::router(DoorOperationHandler::new(handler));
//!
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod door;
pub mod error;
pub mod handler;
pub mod http;
pub mod ids;
pub mod integrity;
pub mod operation_handler;
pub mod outcome;
pub mod storage;
pub mod version;

pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use door::{Door, DoorPatch, NewDoor};
pub use error::{DoorError, DoorResult, ValidationError};
pub use handler::DoorHandler;
pub use ids::IdStrategy;
pub use integrity::{IntegrityIssue, IntegrityReport, check_document};
pub use operation_handler::{
    DoorOperationHandler, DoorOperationRequest, DoorOperationResponse, DoorOperationType,
    OperationMetadata,
};
pub use outcome::Outcome;
pub use storage::{Document, DocumentStore, InMemoryStore, JsonFileStore, StoreError};
pub use version::{HttpVersion, RawVersion, VersionConflict};
