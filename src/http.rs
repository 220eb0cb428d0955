//! HTTP binding for the door API.
//!
//! Routes:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/doors` | 200, all doors |
//! | GET | `/doors/{id}` | 200, the door |
//! | POST | `/doors` | 201, the created door |
//! | PUT | `/doors/{id}` | 200, the merged door |
//! | DELETE | `/doors/{id}` | 200, the deleted door |
//!
//! Missing doors answer 404 `{"message": "Door not found"}` and internal faults 500
//! `{"message": "Something went wrong!"}`. Single-door responses carry an `ETag`;
//! `PUT` and `DELETE` honor `If-Match`. Every request is logged with its status and
//! duration. CORS is permissive so a browser UI on another origin can call the API.

use crate::error::{DoorError, ValidationError};
use crate::operation_handler::{
    DoorOperationHandler, DoorOperationRequest, DoorOperationResponse, create_error_response,
};
use crate::storage::DocumentStore;
use crate::version::HttpVersion;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::{SecondsFormat, Utc};
use log::info;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

type Operations<S> = Arc<DoorOperationHandler<S>>;

/// Build the router serving the door API.
pub fn router<S>(operations: DoorOperationHandler<S>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/doors", get(list_doors::<S>).post(create_door::<S>))
        .route(
            "/doors/{id}",
            get(get_door::<S>)
                .put(update_door::<S>)
                .delete(delete_door::<S>),
        )
        .fallback(route_not_found)
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(operations))
}

async fn list_doors<S: DocumentStore + 'static>(
    State(operations): State<Operations<S>>,
    headers: HeaderMap,
) -> Response {
    let request = with_request_id(DoorOperationRequest::list(), &headers);
    into_response(operations.handle_operation(request).await)
}

async fn get_door<S: DocumentStore + 'static>(
    State(operations): State<Operations<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request = with_request_id(DoorOperationRequest::get(id), &headers);
    into_response(operations.handle_operation(request).await)
}

async fn create_door<S: DocumentStore + 'static>(
    State(operations): State<Operations<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let data = match parse_body(&body, &headers) {
        Ok(data) => data,
        Err(response) => return response,
    };
    let request = with_request_id(DoorOperationRequest::create(data), &headers);
    into_response(operations.handle_operation(request).await)
}

async fn update_door<S: DocumentStore + 'static>(
    State(operations): State<Operations<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let data = match parse_body(&body, &headers) {
        Ok(data) => data,
        Err(response) => return response,
    };
    let request = match conditional(DoorOperationRequest::update(id, data), &headers) {
        Ok(request) => request,
        Err(response) => return response,
    };
    into_response(operations.handle_operation(request).await)
}

async fn delete_door<S: DocumentStore + 'static>(
    State(operations): State<Operations<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request = match conditional(DoorOperationRequest::delete(id), &headers) {
        Ok(request) => request,
        Err(response) => return response,
    };
    into_response(operations.handle_operation(request).await)
}

async fn route_not_found() -> Response {
    message(StatusCode::NOT_FOUND, "Route not found")
}

/// Log one line per request: timestamp, method, uri, status and duration.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "[{}] {} {} - {} - {}ms",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        method,
        uri,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "message": message }))).into_response()
}

fn parse_body(body: &Bytes, headers: &HeaderMap) -> Result<Value, Response> {
    serde_json::from_slice(body).map_err(|e| {
        let error = DoorError::from(ValidationError::MalformedJson {
            message: e.to_string(),
        });
        let request_id =
            request_id(headers).unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        into_response(create_error_response(error, request_id))
    })
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn with_request_id(request: DoorOperationRequest, headers: &HeaderMap) -> DoorOperationRequest {
    match request_id(headers) {
        Some(request_id) => request.with_request_id(request_id),
        None => request,
    }
}

// `If-Match: *` matches any existing door, which is the unconditional behavior.
fn conditional(
    request: DoorOperationRequest,
    headers: &HeaderMap,
) -> Result<DoorOperationRequest, Response> {
    let request = with_request_id(request, headers);
    let Some(value) = headers.get(header::IF_MATCH) else {
        return Ok(request);
    };
    let value = value
        .to_str()
        .map_err(|_| message(StatusCode::BAD_REQUEST, "Invalid If-Match header"))?;
    if value.trim() == "*" {
        return Ok(request);
    }
    let version = value
        .parse::<HttpVersion>()
        .map_err(|e| message(StatusCode::BAD_REQUEST, &e.to_string()))?;
    Ok(request.with_expected_version(version))
}

fn into_response(response: DoorOperationResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut http_response = (status, axum::Json(response.body)).into_response();

    let headers = http_response.headers_mut();
    if let Some(etag) = response
        .metadata
        .etag
        .and_then(|etag| HeaderValue::from_str(&etag).ok())
    {
        headers.insert(header::ETAG, etag);
    }
    if let Ok(request_id) = HeaderValue::from_str(&response.metadata.request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id);
    }
    http_response
}
