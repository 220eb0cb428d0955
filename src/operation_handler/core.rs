//! Core operation handler infrastructure
//!
//! The request/response types and the dispatcher that routes each request to its
//! CRUD handler.

use crate::handler::DoorHandler;
use crate::storage::DocumentStore;
use crate::version::RawVersion;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Framework-agnostic handler for door operations.
pub struct DoorOperationHandler<S: DocumentStore> {
    pub(super) doors: DoorHandler<S>,
}

/// Structured request for a door operation.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorOperationRequest {
    /// The type of operation to perform
    pub operation: DoorOperationType,
    /// Door id for operations that target a single door
    pub door_id: Option<String>,
    /// Payload for create/update operations
    pub data: Option<Value>,
    /// Request ID for tracing and correlation
    pub request_id: Option<String>,
    /// Expected version for conditional update/delete
    pub expected_version: Option<RawVersion>,
}

/// Types of door operations supported by the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorOperationType {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// Response of a door operation, ready to be written by any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorOperationResponse {
    /// HTTP-style status code
    pub status: u16,
    /// JSON body: a door, a list of doors or `{"message": ...}`
    pub body: Value,
    pub metadata: OperationMetadata,
}

/// Metadata about a door operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationMetadata {
    /// Request ID for tracing
    pub request_id: String,
    /// Id of the door involved, if any
    pub door_id: Option<String>,
    /// Number of doors returned
    pub door_count: Option<usize>,
    /// Weak ETag of the returned door
    pub etag: Option<String>,
}

impl DoorOperationResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl<S: DocumentStore> DoorOperationHandler<S> {
    /// Create a new operation handler around a door handler.
    pub fn new(doors: DoorHandler<S>) -> Self {
        Self { doors }
    }

    /// Access the underlying door handler.
    pub fn doors(&self) -> &DoorHandler<S> {
        &self.doors
    }

    /// Handle a structured door operation request.
    ///
    /// Never fails: faults become a 500 response with a fixed message and the
    /// details are only logged.
    pub async fn handle_operation(&self, request: DoorOperationRequest) -> DoorOperationResponse {
        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        debug!(
            "Door operation handler processing {:?} for {:?} (request: '{}')",
            request.operation, request.door_id, request_id
        );

        let result = match request.operation {
            DoorOperationType::List => Ok(super::handlers::handle_list(self, &request_id).await),
            DoorOperationType::Get => super::handlers::handle_get(self, request, &request_id).await,
            DoorOperationType::Create => {
                super::handlers::handle_create(self, request, &request_id).await
            }
            DoorOperationType::Update => {
                super::handlers::handle_update(self, request, &request_id).await
            }
            DoorOperationType::Delete => {
                super::handlers::handle_delete(self, request, &request_id).await
            }
        };

        match result {
            Ok(response) => {
                debug!(
                    "Door operation completed with status {} (request: '{}')",
                    response.status, request_id
                );
                response
            }
            Err(e) => {
                if e.is_client_error() {
                    warn!("Door operation rejected: {} (request: '{}')", e, request_id);
                } else {
                    error!("Door operation failed: {} (request: '{}')", e, request_id);
                }
                super::errors::create_error_response(e, request_id)
            }
        }
    }
}
