//! Integration tests for the correlation bridge behind the RPCs.

use axum::http::StatusCode;
use serde_json::json;

use authgate_bus::MessagePublisher;
use authgate_core::events::{ReplyEnvelope, UserEvent};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_silent_user_service_yields_internal_error() {
    let app = TestApp::new().await;
    app.users.go_silent();

    let response = app
        .post(
            "/api/auth/login",
            json!({ "username": "alice", "password": "wonderland" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["code"], "INTERNAL");
    assert_eq!(response.body["message"], "Internal error");

    assert_eq!(app.gateway.registry().pending_count(), 0);
    assert_eq!(app.gateway.state().bus.metrics().timeouts, 1);
}

#[tokio::test]
async fn test_concurrent_logins_for_same_user_each_get_a_reply() {
    let app = TestApp::new().await;
    app.register("alice", "wonderland").await;

    let (a, b, c) = tokio::join!(
        app.post("/api/auth/login", json!({ "username": "alice", "password": "wonderland" })),
        app.post("/api/auth/login", json!({ "username": "alice", "password": "wonderland" })),
        app.post("/api/auth/login", json!({ "username": "alice", "password": "nope" })),
    );
    assert_eq!(a.status, StatusCode::OK);
    assert_eq!(b.status, StatusCode::OK);
    assert_eq!(c.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.gateway.registry().pending_count(), 0);
}

#[tokio::test]
async fn test_stray_replies_are_dropped() {
    let app = TestApp::new().await;

    let stray = ReplyEnvelope {
        correlation_id: Some("no-such-request".into()),
        event: UserEvent::not_found("alice"),
    };
    app.bus
        .publish("replies.user.events", serde_json::to_vec(&stray).unwrap())
        .await
        .unwrap();
    app.bus
        .publish("replies.user.events", b"{broken".to_vec())
        .await
        .unwrap();

    // Give the listener a chance to consume both.
    for _ in 0..50 {
        let metrics = app.gateway.state().bus.metrics();
        if metrics.replies_dropped + metrics.replies_malformed == 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let metrics = app.gateway.state().bus.metrics();
    assert_eq!(metrics.replies_dropped, 1);
    assert_eq!(metrics.replies_malformed, 1);
    assert_eq!(metrics.replies_matched, 0);
}

#[tokio::test]
async fn test_health_reports_bridge_counters() {
    let app = TestApp::new().await;
    app.register("alice", "wonderland").await;

    let response = app.request("GET", "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["cache"], "connected");
    assert_eq!(response.body["bridge"]["requests_published"], 1);
    assert_eq!(response.body["bridge"]["replies_matched"], 1);
    assert_eq!(response.body["bridge"]["pending"], 0);
}

#[tokio::test]
async fn test_shutdown_rejects_new_requests() {
    let app = TestApp::new().await;
    let router = app.router.clone();
    let registry = app.gateway.registry().clone();

    app.gateway
        .shutdown(std::time::Duration::from_secs(1))
        .await;
    assert!(registry.is_closed());

    let response = {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "username": "alice", "password": "wonderland" }).to_string(),
            ))
            .unwrap();
        router.oneshot(request).await.unwrap()
    };
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
