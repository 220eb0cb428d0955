//! On-disk document format and degraded reads.

use crate::common::TestApp;
use crate::common::fixtures::{front_door, legacy_document};
use axum::http::StatusCode;
use doorstore::IdStrategy;
use serde_json::json;

#[tokio::test]
async fn test_corrupt_document_reads_as_empty() {
    let app = TestApp::with_content("{ this is not json");

    let response = app.get("/doors").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
    assert_eq!(app.get("/doors/1").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_replaces_corrupt_document() {
    let app = TestApp::with_content("[1, 2, 3]");

    let response = app.post("/doors", front_door()).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["id"], "1");
    assert_eq!(app.document()["doors"][0]["name"], "Front");
}

#[tokio::test]
async fn test_document_is_pretty_printed_and_stable() {
    let mut app = TestApp::new();
    app.post("/doors", front_door()).await;
    let written = app.raw_document();

    assert_eq!(
        written,
        "{\n  \"doors\": [\n    {\n      \"id\": \"1\",\n      \"name\": \"Front\",\n      \"description\": \"Main entrance\",\n      \"status\": \"closed\"\n    }\n  ],\n  \"sequences\": {\n    \"doors\": 1\n  }\n}"
    );

    // An update with nothing to merge leaves the file untouched
    app.restart(IdStrategy::Counter);
    app.put("/doors/1", json!({})).await;
    assert_eq!(app.raw_document(), written);
}

#[tokio::test]
async fn test_unrelated_keys_survive_writes() {
    let app = TestApp::with_content(legacy_document());

    app.put("/doors/2", json!({"status": "closed"})).await;
    app.delete("/doors/1").await;

    let document = app.document();
    assert_eq!(document["windows"], json!({"count": 4}));
    assert_eq!(document["doors"].as_array().unwrap().len(), 1);
    assert_eq!(document["doors"][0]["floor"], 0);
}

#[tokio::test]
async fn test_numeric_ids_are_addressable() {
    let app = TestApp::with_content(legacy_document());

    let response = app.get("/doors/1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"id": 1, "name": "Front", "description": "Main entrance", "status": "closed"})
    );
}

#[tokio::test]
async fn test_no_temp_files_left_behind() {
    let app = TestApp::new();
    for _ in 0..5 {
        app.post("/doors", front_door()).await;
    }

    let entries: Vec<String> = std::fs::read_dir(app.dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["db.json".to_string()]);
}

#[tokio::test]
async fn test_sparse_entries_survive_other_writes() {
    let app = TestApp::with_content(
        r#"{"doors": [{"id": "1", "name": "Side"}, {"id": "2", "name": "Back", "description": "Garden", "status": "open"}]}"#,
    );

    let got = app.get("/doors/1").await;
    assert_eq!(got.body, json!({"id": "1", "name": "Side"}));

    let updated = app.put("/doors/2", json!({"status": "closed"})).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(app.document()["doors"][0], json!({"id": "1", "name": "Side"}));

    let deleted = app.delete("/doors/1").await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({"id": "1", "name": "Side"}));
}

#[tokio::test]
async fn test_unaddressable_entries_are_kept_on_write() {
    let app = TestApp::with_content(
        r#"{"doors": [{"id": "1", "name": "Front", "status": null}, {"id": true}]}"#,
    );

    assert_eq!(app.get("/doors/1").await.status, StatusCode::OK);
    let response = app.post("/doors", front_door()).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["id"], "3");
    let doors = app.document()["doors"].clone();
    assert_eq!(doors[0], json!({"id": "1", "name": "Front", "status": null}));
    assert_eq!(doors[1], json!({"id": true}));
}

#[tokio::test]
async fn test_collection_of_wrong_shape_is_never_overwritten() {
    let app = TestApp::with_content(r#"{"doors": {"a": {"id": "1", "name": "Front"}}}"#);
    let before = app.raw_document();

    let response = app.post("/doors", front_door()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({"message": "Something went wrong!"}));
    assert_eq!(app.raw_document(), before);
    assert_eq!(app.get("/doors").await.body, json!([]));
    assert_eq!(app.get("/doors/1").await.status, StatusCode::NOT_FOUND);
}
