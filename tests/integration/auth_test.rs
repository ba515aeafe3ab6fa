//! Integration tests for the login, register, verify and logout RPCs.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_then_duplicate_is_conflict() {
    let app = TestApp::new().await;

    let user_id = app.register("alice", "wonderland").await;
    assert_eq!(user_id, "1");

    let stored = app.users.user("alice").unwrap();
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert_eq!(stored.email, "alice@example.com");

    let response = app
        .post(
            "/api/auth/register",
            json!({ "username": "alice", "email": "alice@example.com", "password": "again" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], "ALREADY_EXISTS");
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("Username already exists")
    );
}

#[tokio::test]
async fn test_register_response_shape() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/auth/register",
            json!({ "username": "bob", "email": "bob@example.com", "password": "builder" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "bob");
    assert_eq!(response.body["status"], "CREATED");
}

#[tokio::test]
async fn test_login_then_verify() {
    let app = TestApp::new().await;
    let user_id = app.register("alice", "wonderland").await;

    let response = app
        .post(
            "/api/auth/login",
            json!({ "username": "alice", "password": "wonderland" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["expires_in"], 1800);
    let token = response.body["access_token"].as_str().unwrap();
    assert!(!token.is_empty());

    let verify = app.post("/api/auth/verify", json!({ "token": token })).await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["valid"], true);
    assert_eq!(verify.body["username"], "alice");
    assert_eq!(verify.body["user_id"], user_id.as_str());
    assert_eq!(verify.body["roles"], json!(["USER"]));
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthenticated() {
    let app = TestApp::new().await;
    app.register("alice", "wonderland").await;

    let response = app
        .post(
            "/api/auth/login",
            json!({ "username": "alice", "password": "looking-glass" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_login_unknown_user_is_unauthenticated() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/auth/login",
            json!({ "username": "nobody", "password": "whatever" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::new().await;
    app.register("alice", "wonderland").await;
    let token = app.login("alice", "wonderland").await;

    let logout = app.post("/api/auth/logout", json!({ "token": token })).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["revoked"], true);

    let verify = app.post("/api/auth/verify", json!({ "token": token })).await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["valid"], false);
    assert!(verify.body.get("username").is_none());
}

#[tokio::test]
async fn test_each_login_gets_its_own_session() {
    let app = TestApp::new().await;
    app.register("alice", "wonderland").await;
    let first = app.login("alice", "wonderland").await;
    let second = app.login("alice", "wonderland").await;
    assert_ne!(first, second);

    app.post("/api/auth/logout", json!({ "token": first })).await;

    let verify = app.post("/api/auth/verify", json!({ "token": second })).await;
    assert_eq!(verify.body["valid"], true);
}

#[tokio::test]
async fn test_verify_garbage_token_is_not_an_error() {
    let app = TestApp::new().await;

    let verify = app
        .post("/api/auth/verify", json!({ "token": "not.a.token" }))
        .await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["valid"], false);
}

#[tokio::test]
async fn test_verify_empty_token_is_not_an_error() {
    let app = TestApp::new().await;

    let verify = app.post("/api/auth/verify", json!({ "token": "" })).await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["valid"], false);

    let logout = app.post("/api/auth/logout", json!({ "token": "" })).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["revoked"], false);
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let app = TestApp::new().await;

    let bad_email = app
        .post(
            "/api/auth/register",
            json!({ "username": "carol", "email": "nope", "password": "pw" }),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["code"], "INVALID_ARGUMENT");

    let missing_field = app
        .post("/api/auth/login", json!({ "username": "carol" }))
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.body["code"], "INVALID_ARGUMENT");
}
