//! Saved subtitle integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};

use subvault_core::SubtitleId;

async fn save(harness: &TestHarness, title: &str) -> Value {
    let response = harness
        .server
        .post("/api/subtitles")
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .json(&json!({ "title": title, "content": "transcript text" }))
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn save_and_list_newest_first() {
    let harness = TestHarness::new().await;

    let first = save(&harness, "First").await;
    assert_eq!(first["subtitle"]["title"], "First");
    assert_eq!(first["subtitle"]["user_id"], harness.test_user_id.to_string());
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    save(&harness, "Second").await;

    let response = harness
        .server
        .get("/api/subtitles")
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let titles: Vec<&str> = body["subtitles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Second", "First"]);
}

#[tokio::test]
async fn list_is_scoped_to_the_caller() {
    let harness = TestHarness::new().await;
    save(&harness, "Mine").await;

    let response = harness
        .server
        .get("/api/subtitles")
        .add_header(TestHarness::auth_name(), TestHarness::other_user_auth_header())
        .await;

    let body: Value = response.json();
    assert_eq!(body["subtitles"], json!([]));
}

#[tokio::test]
async fn save_requires_title_and_content() {
    let harness = TestHarness::new().await;

    for body in [
        json!({ "title": "", "content": "text" }),
        json!({ "title": "Title", "content": "  " }),
        json!({ "title": null, "content": "text" }),
        json!({ "title": "Title", "content": null }),
        json!({}),
    ] {
        let response = harness
            .server
            .post("/api/subtitles")
            .add_header(TestHarness::auth_name(), harness.user_auth_header())
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Title and content are required");
    }
}

#[tokio::test]
async fn save_with_wrong_field_types_is_a_json_bad_request() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/api/subtitles")
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .json(&json!({ "title": 5, "content": "text" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn sixth_save_exceeds_free_tier() {
    let harness = TestHarness::new().await;

    for i in 0..5 {
        save(&harness, &format!("Video {i}")).await;
    }

    let response = harness
        .server
        .post("/api/subtitles")
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .json(&json!({ "title": "One too many", "content": "text" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "QUOTA_EXCEEDED");
    assert_eq!(body["quota"]["used"], 5);
    assert_eq!(body["quota"]["remaining"], 0);
}

#[tokio::test]
async fn personal_key_lifts_save_limit() {
    let harness = TestHarness::new().await;
    harness.seed_subtitles(5).await;
    harness.seed_personal_key("sd_personal").await;

    save(&harness, "Unmetered").await;
}

#[tokio::test]
async fn delete_own_subtitle() {
    let harness = TestHarness::new().await;
    let saved = save(&harness, "Doomed").await;
    let id = saved["subtitle"]["id"].as_str().unwrap().to_string();

    let response = harness
        .server
        .delete(&format!("/api/subtitles/{id}"))
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let response = harness
        .server
        .get("/api/subtitles")
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .await;
    let body: Value = response.json();
    assert_eq!(body["subtitles"], json!([]));
}

#[tokio::test]
async fn delete_other_users_subtitle_is_not_found() {
    let harness = TestHarness::new().await;
    let saved = save(&harness, "Keep out").await;
    let id = saved["subtitle"]["id"].as_str().unwrap().to_string();

    let response = harness
        .server
        .delete(&format!("/api/subtitles/{id}"))
        .add_header(TestHarness::auth_name(), TestHarness::other_user_auth_header())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // Still there for the owner
    let response = harness
        .server
        .get("/api/subtitles")
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .await;
    let body: Value = response.json();
    assert_eq!(body["subtitles"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_unknown_or_malformed_id() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .delete(&format!("/api/subtitles/{}", SubtitleId::generate()))
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = harness
        .server
        .delete("/api/subtitles/not-an-id")
        .add_header(TestHarness::auth_name(), harness.user_auth_header())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid subtitle ID");
}

#[tokio::test]
async fn subtitles_require_auth() {
    let harness = TestHarness::new().await;

    harness
        .server
        .get("/api/subtitles")
        .await
        .assert_status_unauthorized();

    let response = harness
        .server
        .get("/api/subtitles")
        .add_header(
            TestHarness::auth_name(),
            axum::http::HeaderValue::from_static("Bearer not.a.jwt"),
        )
        .await;
    response.assert_status_unauthorized();
}
