//! Counter and legacy length id strategies.

use crate::common::TestApp;
use crate::common::fixtures::{back_door, front_door};
use doorstore::IdStrategy;
use serde_json::json;

#[tokio::test]
async fn test_counter_never_reuses_ids_after_delete() {
    let app = TestApp::new();
    for _ in 0..3 {
        app.post("/doors", front_door()).await;
    }
    app.delete("/doors/2").await;

    let response = app.post("/doors", back_door()).await;

    assert_eq!(response.body["id"], "4");
    let ids: Vec<_> = app
        .get("/doors")
        .await
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|door| door["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("1"), json!("3"), json!("4")]);
}

#[tokio::test]
async fn test_counter_survives_restart() {
    let mut app = TestApp::new();
    app.post("/doors", front_door()).await;
    app.post("/doors", front_door()).await;
    app.delete("/doors/2").await;

    app.restart(IdStrategy::Counter);
    let response = app.post("/doors", back_door()).await;

    assert_eq!(response.body["id"], "3");
    assert_eq!(app.document()["sequences"], json!({"doors": 3}));
}

#[tokio::test]
async fn test_counter_seeds_from_existing_ids() {
    let app = TestApp::with_content(r#"{"doors": [{"id": "7", "name": "Old"}]}"#);

    let response = app.post("/doors", front_door()).await;

    assert_eq!(response.body["id"], "8");
}

#[tokio::test]
async fn test_length_strategy_matches_legacy_behavior() {
    let app = TestApp::with_id_strategy(IdStrategy::CollectionLength);
    for _ in 0..3 {
        app.post("/doors", front_door()).await;
    }
    app.delete("/doors/1").await;

    // Two doors remain, so the next id is "3", the same as a door still stored
    let response = app.post("/doors", back_door()).await;

    assert_eq!(response.body["id"], "3");
    assert!(app.document().get("sequences").is_none());
    let doors = app.get("/doors").await.body;
    let threes = doors
        .as_array()
        .unwrap()
        .iter()
        .filter(|door| door["id"] == "3")
        .count();
    assert_eq!(threes, 2);
}
