//! Saved set API tests.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use flashgenius_core::{Flashcard, FlashcardSet, FlashcardStore};
use serde_json::{json, Value};

use common::fixtures;
use common::TestContext;

fn seed(ctx: &TestContext, profile: &str, id: &str, name: &str, age_days: i64) {
    let set = FlashcardSet {
        id: id.to_string(),
        name: name.to_string(),
        flashcards: vec![
            Flashcard::new("Capital of France?", "Paris"),
            Flashcard::new("Highest mountain?", "Everest"),
        ],
        created_at: Utc::now() - Duration::days(age_days),
    };
    ctx.state.db.for_profile(Some(profile)).save(&set).unwrap();
}

/// Listing without a profile is empty.
#[tokio::test]
async fn test_list_without_profile_is_empty() {
    let ctx = TestContext::new().await;
    seed(&ctx, "alice", "a1", "Geography", 0);
    let server = ctx.server();

    let response = server.get("/api/sets").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["sets"].as_array().unwrap().is_empty());
}

/// Sets are listed newest first with card counts.
#[tokio::test]
async fn test_list_newest_first() {
    let ctx = TestContext::new().await;
    seed(&ctx, "alice", "old", "Old set", 3);
    seed(&ctx, "alice", "new", "New set", 0);
    seed(&ctx, "alice", "mid", "Middle set", 1);
    let server = ctx.server();

    let body: Value = server
        .get("/api/sets")
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .await
        .json();

    let sets = body["sets"].as_array().unwrap();
    let ids: Vec<&str> = sets.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
    assert_eq!(sets[0]["card_count"], 2);
}

/// Profiles do not see each other's sets.
#[tokio::test]
async fn test_profiles_isolated() {
    let ctx = TestContext::new().await;
    seed(&ctx, "alice", "a1", "Alice's set", 0);
    let server = ctx.server();

    server
        .get("/api/sets/a1")
        .add_header(TestContext::profile_header(), TestContext::profile_value("bob"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let body: Value = server
        .get("/api/sets/a1")
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .await
        .json();
    assert_eq!(body["name"], "Alice's set");
    assert_eq!(body["flashcards"], fixtures::geography());
}

/// Deleting removes the set; deleting again is 404.
#[tokio::test]
async fn test_delete_set() {
    let ctx = TestContext::new().await;
    seed(&ctx, "alice", "a1", "Geography", 0);
    let server = ctx.server();

    server
        .delete("/api/sets/a1")
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get("/api/sets/a1")
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete("/api/sets/a1")
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Studying a stored set keeps its identity, so saving updates it in place.
#[tokio::test]
async fn test_study_stored_set() {
    let ctx = TestContext::new().await;
    seed(&ctx, "alice", "a1", "Geography", 2);
    let server = ctx.server();

    let response = server
        .post("/api/sets/a1/study")
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["state"], "reviewing");
    assert_eq!(body["session"]["set_id"], "a1");
    assert_eq!(body["session"]["set_name"], "Geography");
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let receipt: Value = server
        .post(&format!("/api/sessions/{}/save", session_id))
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .json(&json!({ "name": "World Geography" }))
        .await
        .json();
    assert_eq!(receipt["id"], "a1");
    assert_eq!(receipt["created"], false);

    let list: Value = server
        .get("/api/sets")
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .await
        .json();
    let sets = list["sets"].as_array().unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0]["name"], "World Geography");
}

/// Studying an empty stored set reports the empty state.
#[tokio::test]
async fn test_study_empty_set() {
    let ctx = TestContext::new().await;
    let empty = FlashcardSet {
        id: "e1".to_string(),
        name: "Empty".to_string(),
        flashcards: vec![],
        created_at: Utc::now(),
    };
    ctx.state.db.for_profile(Some("alice")).save(&empty).unwrap();
    let server = ctx.server();

    let body: Value = server
        .post("/api/sets/e1/study")
        .add_header(TestContext::profile_header(), TestContext::profile_value("alice"))
        .await
        .json();

    assert_eq!(body["state"], "empty");
    assert_eq!(ctx.state.sessions.len().unwrap(), 0);
}

/// Health check responds without a profile.
#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}
