//! ETag / If-Match concurrency control.
//!
//! Two clients that read the same door and then both write must not silently
//! overwrite each other: the second write carries a stale ETag and is refused.

use crate::common::fixtures::front_door;
use crate::common::{TestApp, request};
use axum::http::{StatusCode, header};
use serde_json::json;

#[tokio::test]
async fn test_stale_etag_prevents_lost_update() {
    let app = TestApp::new();
    app.post("/doors", front_door()).await;

    // Both clients read the same version
    let etag = app.get("/doors/1").await.etag().unwrap();

    let first = app
        .send(request(
            "PUT",
            "/doors/1",
            Some(json!({"status": "open"}).to_string()),
            &[(header::IF_MATCH.as_str(), etag.as_str())],
        ))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_ne!(first.etag().unwrap(), etag);

    let second = app
        .send(request(
            "PUT",
            "/doors/1",
            Some(json!({"name": "Renamed"}).to_string()),
            &[(header::IF_MATCH.as_str(), etag.as_str())],
        ))
        .await;
    assert_eq!(second.status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(second.etag(), first.etag());
    assert!(second.body["currentVersion"].is_string());

    let stored = app.get("/doors/1").await.body;
    assert_eq!(stored["name"], "Front");
    assert_eq!(stored["status"], "open");
}

#[tokio::test]
async fn test_conditional_delete() {
    let app = TestApp::new();
    app.post("/doors", front_door()).await;
    let etag = app.get("/doors/1").await.etag().unwrap();
    app.put("/doors/1", json!({"status": "open"})).await;

    let stale = app
        .send(request(
            "DELETE",
            "/doors/1",
            None,
            &[(header::IF_MATCH.as_str(), etag.as_str())],
        ))
        .await;
    assert_eq!(stale.status, StatusCode::PRECONDITION_FAILED);

    let current = app.get("/doors/1").await.etag().unwrap();
    let fresh = app
        .send(request(
            "DELETE",
            "/doors/1",
            None,
            &[(header::IF_MATCH.as_str(), current.as_str())],
        ))
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
    assert_eq!(app.get("/doors").await.body, json!([]));
}

#[tokio::test]
async fn test_if_match_on_missing_door_is_404() {
    let app = TestApp::new();

    let response = app
        .send(request(
            "DELETE",
            "/doors/3",
            None,
            &[(header::IF_MATCH.as_str(), "W/\"abc\"")],
        ))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_creates_get_unique_ids() {
    let app = std::sync::Arc::new(TestApp::new());

    let tasks: Vec<_> = (0..10)
        .map(|n| {
            let app = app.clone();
            tokio::spawn(async move {
                app.post(
                    "/doors",
                    json!({"name": format!("Door {}", n), "description": "Concurrent"}),
                )
                .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in futures::future::join_all(tasks).await {
        let response = task.unwrap();
        assert_eq!(response.status, StatusCode::CREATED);
        ids.push(response.body["id"].as_str().unwrap().to_string());
    }
    ids.sort_by_key(|id| id.parse::<u32>().unwrap());
    let expected: Vec<String> = (1..=10).map(|id| id.to_string()).collect();
    assert_eq!(ids, expected);
    assert_eq!(app.get("/doors").await.body.as_array().unwrap().len(), 10);
}
