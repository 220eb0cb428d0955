//! CRUD operation handlers
//!
//! Each function runs one door operation and renders its [`Outcome`] as a response.

use crate::door::Door;
use crate::error::{DoorError, DoorResult};
use crate::operation_handler::core::{
    DoorOperationHandler, DoorOperationRequest, DoorOperationResponse, OperationMetadata,
};
use crate::operation_handler::errors::{create_not_found_response, create_version_conflict_response};
use crate::outcome::Outcome;
use crate::storage::DocumentStore;
use crate::version::{HttpVersion, RawVersion};
use serde_json::Value;

pub async fn handle_list<S: DocumentStore>(
    handler: &DoorOperationHandler<S>,
    request_id: &str,
) -> DoorOperationResponse {
    let doors = handler.doors.list().await;
    DoorOperationResponse {
        status: 200,
        metadata: OperationMetadata {
            request_id: request_id.to_string(),
            door_count: Some(doors.len()),
            ..OperationMetadata::default()
        },
        body: Value::Array(doors),
    }
}

pub async fn handle_get<S: DocumentStore>(
    handler: &DoorOperationHandler<S>,
    request: DoorOperationRequest,
    request_id: &str,
) -> DoorResult<DoorOperationResponse> {
    let door_id = required_id(&request)?;
    let outcome = handler.doors.get(&door_id).await?;
    render(outcome, door_id, request_id)
}

pub async fn handle_create<S: DocumentStore>(
    handler: &DoorOperationHandler<S>,
    request: DoorOperationRequest,
    request_id: &str,
) -> DoorResult<DoorOperationResponse> {
    let data = request
        .data
        .ok_or_else(|| DoorError::internal("Missing data for create operation"))?;
    let outcome = handler.doors.create(data).await?;
    render(outcome, String::new(), request_id)
}

pub async fn handle_update<S: DocumentStore>(
    handler: &DoorOperationHandler<S>,
    request: DoorOperationRequest,
    request_id: &str,
) -> DoorResult<DoorOperationResponse> {
    let door_id = required_id(&request)?;
    let data = request
        .data
        .ok_or_else(|| DoorError::internal("Missing data for update operation"))?;
    let outcome = handler
        .doors
        .update(&door_id, data, request.expected_version.as_ref())
        .await?;
    render(outcome, door_id, request_id)
}

pub async fn handle_delete<S: DocumentStore>(
    handler: &DoorOperationHandler<S>,
    request: DoorOperationRequest,
    request_id: &str,
) -> DoorResult<DoorOperationResponse> {
    let door_id = required_id(&request)?;
    let outcome = handler
        .doors
        .delete(&door_id, request.expected_version.as_ref())
        .await?;
    render(outcome, door_id, request_id)
}

fn required_id(request: &DoorOperationRequest) -> DoorResult<String> {
    request.door_id.clone().ok_or_else(|| {
        DoorError::internal(format!("Missing door id for {:?} operation", request.operation))
    })
}

fn render(
    outcome: Outcome<Door>,
    door_id: String,
    request_id: &str,
) -> DoorResult<DoorOperationResponse> {
    let (status, door) = match outcome {
        Outcome::Success(door) => (200, door),
        Outcome::Created(door) => (201, door),
        Outcome::NotFound => {
            return Ok(create_not_found_response(Some(door_id), request_id.to_string()));
        }
        Outcome::VersionMismatch(conflict) => {
            return Ok(create_version_conflict_response(
                conflict,
                Some(door_id),
                request_id.to_string(),
            ));
        }
    };

    let etag = HttpVersion::from(RawVersion::of(&door)?).to_string();
    Ok(DoorOperationResponse {
        status,
        metadata: OperationMetadata {
            request_id: request_id.to_string(),
            door_id: Some(door.id().to_string()),
            door_count: Some(1),
            etag: Some(etag),
        },
        body: door.into_value(),
    })
}
