//! Request builder utilities for DoorOperationRequest

use crate::operation_handler::core::{DoorOperationRequest, DoorOperationType};
use crate::version::RawVersion;
use serde_json::Value;

impl DoorOperationRequest {
    fn new(operation: DoorOperationType, door_id: Option<String>, data: Option<Value>) -> Self {
        Self {
            operation,
            door_id,
            data,
            request_id: None,
            expected_version: None,
        }
    }

    pub fn list() -> Self {
        Self::new(DoorOperationType::List, None, None)
    }

    pub fn get(door_id: impl Into<String>) -> Self {
        Self::new(DoorOperationType::Get, Some(door_id.into()), None)
    }

    pub fn create(data: Value) -> Self {
        Self::new(DoorOperationType::Create, None, Some(data))
    }

    pub fn update(door_id: impl Into<String>, data: Value) -> Self {
        Self::new(DoorOperationType::Update, Some(door_id.into()), Some(data))
    }

    pub fn delete(door_id: impl Into<String>) -> Self {
        Self::new(DoorOperationType::Delete, Some(door_id.into()), None)
    }

    /// Add request ID to the request.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Make an update or delete conditional on the door's current version.
    ///
    /// ```rust
    /// use doorstore::operation_handler::DoorOperationRequest;
    /// use doorstore::version::HttpVersion;
    /// use serde_json::json;
    ///
    /// let version: HttpVersion = "W/\"abc123\"".parse().unwrap();
    /// let request = DoorOperationRequest::update("1", json!({"status": "open"}))
    ///     .with_expected_version(version);
    /// assert!(request.expected_version.is_some());
    /// ```
    pub fn with_expected_version(mut self, version: impl Into<RawVersion>) -> Self {
        self.expected_version = Some(version.into());
        self
    }
}
