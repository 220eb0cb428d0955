//! Error handling utilities for operation handlers
//!
//! Response constructors for the non-success paths. Bodies always have the shape
//! `{"message": ...}`; internal failures never leak their details to the client.

use crate::error::DoorError;
use crate::operation_handler::core::{DoorOperationResponse, OperationMetadata};
use crate::version::VersionConflict;
use serde_json::json;

pub const NOT_FOUND_MESSAGE: &str = "Door not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

fn message_response(status: u16, message: &str, metadata: OperationMetadata) -> DoorOperationResponse {
    DoorOperationResponse {
        status,
        body: json!({ "message": message }),
        metadata,
    }
}

/// Create an error response from a DoorError.
///
/// Validation failures become 400 with their description, everything else a 500
/// with [`INTERNAL_ERROR_MESSAGE`].
pub fn create_error_response(error: DoorError, request_id: String) -> DoorOperationResponse {
    let metadata = OperationMetadata {
        request_id,
        ..OperationMetadata::default()
    };
    match error {
        DoorError::Validation(validation) => {
            message_response(400, &validation.to_string(), metadata)
        }
        _ => message_response(500, INTERNAL_ERROR_MESSAGE, metadata),
    }
}

/// Create the 404 response for a missing door.
pub fn create_not_found_response(door_id: Option<String>, request_id: String) -> DoorOperationResponse {
    message_response(
        404,
        NOT_FOUND_MESSAGE,
        OperationMetadata {
            request_id,
            door_id,
            ..OperationMetadata::default()
        },
    )
}

/// Create a response for version conflicts.
pub fn create_version_conflict_response(
    conflict: VersionConflict,
    door_id: Option<String>,
    request_id: String,
) -> DoorOperationResponse {
    let mut response = message_response(
        412,
        &conflict.message,
        OperationMetadata {
            request_id,
            door_id,
            etag: Some(crate::version::HttpVersion::from(conflict.current.clone()).to_string()),
            ..OperationMetadata::default()
        },
    );
    response.body["currentVersion"] = json!(conflict.current.as_str());
    response
}
