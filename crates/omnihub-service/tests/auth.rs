//! Registration, login, and session integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn register_then_me() {
    let harness = TestHarness::new();

    let (token, user_id) = harness.register("new@example.com", "password123").await;

    let response = harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["role"], "user");
    assert_eq!(body["credits"], 0);
    assert_eq!(body["is_active"], true);
    // The password digest never leaves the store.
    assert!(body.get("password_digest").is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let harness = TestHarness::new();
    harness.register("dupe@example.com", "password123").await;

    let response = harness
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": "Dupe@Example.com",
            "name": "Other",
            "password": "password456",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_validates_input() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth/register")
        .json(&json!({ "email": "not-an-email", "name": "X", "password": "password123" }))
        .await;
    response.assert_status_bad_request();

    let response = harness
        .server
        .post("/api/auth/register")
        .json(&json!({ "email": "ok@example.com", "name": "X", "password": "short" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn login_roundtrip() {
    let harness = TestHarness::new();
    harness.register("login@example.com", "password123").await;

    let token = harness.login("login@example.com", "password123").await;

    harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", TestHarness::bearer(&token))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn login_wrong_password_fails() {
    let harness = TestHarness::new();
    harness.register("user@example.com", "password123").await;

    let response = harness
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "user@example.com", "password": "wrong-password" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn login_unknown_email_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ghost@example.com", "password": "password123" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn suspended_account_cannot_login() {
    let harness = TestHarness::new();
    let (_, user_id) = harness.register("frozen@example.com", "password123").await;

    use omnihub_store::Store;
    harness.store.set_active(&user_id, false).unwrap();

    let response = harness
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "frozen@example.com", "password": "password123" }))
        .await;

    response.assert_status_forbidden();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "suspended");
}

#[tokio::test]
async fn me_requires_token() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/api/auth/me")
        .await
        .assert_status_unauthorized();

    harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", "Bearer not-a-real-token")
        .await
        .assert_status_unauthorized();
}
