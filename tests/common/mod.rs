//! Common test utilities for door service testing.
//!
//! [`TestApp`] wires the real file store, handler and router over a temporary
//! directory, so each test gets its own document and can inspect it on disk.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use doorstore::{DoorHandler, DoorOperationHandler, IdStrategy, JsonFileStore, http};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

pub mod fixtures;

/// Response captured from the router
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn etag(&self) -> Option<String> {
        self.headers
            .get(header::ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

/// A router backed by a document in its own temporary directory.
pub struct TestApp {
    pub dir: TempDir,
    pub path: PathBuf,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_id_strategy(IdStrategy::default())
    }

    pub fn with_id_strategy(id_strategy: IdStrategy) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("db.json");
        let router = build_router(&path, id_strategy);
        Self { dir, path, router }
    }

    /// Start with `content` already written to the document.
    pub fn with_content(content: &str) -> Self {
        let app = Self::new();
        std::fs::write(&app.path, content).expect("Failed to seed document");
        app
    }

    /// A fresh router over the same document, as after a server restart.
    pub fn restart(&mut self, id_strategy: IdStrategy) {
        self.router = build_router(&self.path, id_strategy);
    }

    pub fn document(&self) -> Value {
        let content = std::fs::read_to_string(&self.path).expect("Failed to read document");
        serde_json::from_str(&content).expect("Document is not valid JSON")
    }

    pub fn raw_document(&self) -> String {
        std::fs::read_to_string(&self.path).expect("Failed to read document")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request("GET", uri, None, &[])).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(request("POST", uri, Some(body.to_string()), &[]))
            .await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(request("PUT", uri, Some(body.to_string()), &[]))
            .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(request("DELETE", uri, None, &[])).await
    }
}

fn build_router(path: &Path, id_strategy: IdStrategy) -> Router {
    let store = JsonFileStore::new(path);
    http::router(DoorOperationHandler::new(DoorHandler::with_id_strategy(
        store,
        id_strategy,
    )))
}

/// Build a request with an optional JSON body and extra headers.
pub fn request(
    method: &str,
    uri: &str,
    body: Option<String>,
    headers: &[(&str, &str)],
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .expect("Failed to build request")
}
