//! Framework-agnostic door operation handler.
//!
//! Maps structured requests to door operations and their results to a status code
//! plus JSON body, independent of any HTTP framework. The HTTP layer only translates
//! routes and headers into [`DoorOperationRequest`]s.
//!
//! # Key Types
//!
//! - [`DoorOperationHandler`] - dispatches requests to a [`DoorHandler`](crate::handler::DoorHandler)
//! - [`DoorOperationRequest`] - operation, door id, payload, expected version
//! - [`DoorOperationResponse`] - status, body and metadata (request id, ETag)
//!
//! # Examples
//!
//! ```rust
//! use doorstore::handler::DoorHandler;
//! use doorstore::operation_handler::{DoorOperationHandler, DoorOperationRequest};
//! use doorstore::storage::InMemoryStore;
//! use serde_json::json;
//!
//! # async fn example() {
//! let handler = DoorOperationHandler::new(DoorHandler::new(InMemoryStore::new()));
//!
//! let response = handler.handle_operation(DoorOperationRequest::get("99")).await;
//! assert_eq!(response.status, 404);
//! assert_eq!(response.body, json!({"message": "Door not found"}));
//! # }
//! ```

mod builders;
mod core;
mod errors;
mod handlers;

pub use core::{
    DoorOperationHandler, DoorOperationRequest, DoorOperationResponse, DoorOperationType,
    OperationMetadata,
};

pub use errors::{
    INTERNAL_ERROR_MESSAGE, NOT_FOUND_MESSAGE, create_error_response, create_not_found_response,
    create_version_conflict_response,
};
