//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

use authgate_api::{Gateway, Transport};
use authgate_bus::transport::InMemoryBus;
use authgate_bus::{MessagePublisher, MessageSubscriber};
use authgate_core::config::AppConfig;
use authgate_core::events::{
    ReplyEnvelope, RequestEnvelope, UserCreateRequest, UserEvent, UserFindRequest,
};

/// A user as stored by the fake persistence service.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Stand-in for the user persistence service living across the bus.
#[derive(Debug, Clone, Default)]
pub struct FakeUserService {
    users: Arc<Mutex<HashMap<String, StoredUser>>>,
    next_id: Arc<AtomicI64>,
    silent: Arc<AtomicBool>,
}

impl FakeUserService {
    /// Stop answering requests.
    pub fn go_silent(&self) {
        self.silent.store(true, Ordering::SeqCst);
    }

    pub fn user(&self, username: &str) -> Option<StoredUser> {
        self.users.lock().unwrap().get(username).cloned()
    }

    fn find(&self, request: &UserFindRequest) -> UserEvent {
        match self.user(&request.username) {
            Some(user) => UserEvent::found(user.id, &request.username, user.password_hash),
            None => UserEvent::not_found(&request.username),
        }
    }

    fn create(&self, request: &UserCreateRequest) -> UserEvent {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&request.username) {
            return UserEvent::error(&request.username, "Username already exists");
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        users.insert(
            request.username.clone(),
            StoredUser {
                id,
                email: request.email.clone(),
                password_hash: request.password_hash.clone(),
            },
        );
        UserEvent::created(id, &request.username, &request.email)
    }

    /// Answer every request published on `topic` with `handle`.
    async fn serve<P, F>(&self, bus: InMemoryBus, topic: &str, handle: F)
    where
        P: DeserializeOwned + Send + 'static,
        F: Fn(&Self, &P) -> UserEvent + Send + 'static,
    {
        let mut requests = bus.subscribe(topic).await.unwrap();
        let service = self.clone();
        tokio::spawn(async move {
            while let Some(message) = requests.next().await {
                if service.silent.load(Ordering::SeqCst) {
                    continue;
                }
                let request: RequestEnvelope<P> = serde_json::from_slice(&message.payload).unwrap();
                let reply = ReplyEnvelope {
                    correlation_id: Some(request.correlation_id),
                    event: handle(&service, &request.payload),
                };
                bus.publish(&request.reply_to, serde_json::to_vec(&reply).unwrap())
                    .await
                    .unwrap();
            }
        });
    }
}

/// Parsed HTTP response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Test application context.
pub struct TestApp {
    pub router: Router,
    pub gateway: Gateway,
    pub users: FakeUserService,
    pub bus: InMemoryBus,
}

impl TestApp {
    /// Gateway with default configuration and a short reply deadline.
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.bus.request_timeout_ms = 300;
        Self::with_config(config).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let bus = InMemoryBus::new(64);
        let users = FakeUserService::default();
        users
            .serve::<UserFindRequest, _>(bus.clone(), &config.bus.topics.find, FakeUserService::find)
            .await;
        users
            .serve::<UserCreateRequest, _>(bus.clone(), &config.bus.topics.create, FakeUserService::create)
            .await;

        let gateway = Gateway::start(&config, Transport::in_memory(bus.clone()))
            .await
            .unwrap();

        Self {
            router: gateway.router(),
            gateway,
            users,
            bus,
        }
    }

    /// Send a JSON request to the router.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body = match body {
            Some(json) => Body::from(serde_json::to_vec(&json).unwrap()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Register `username` and return the created user id.
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/auth/register",
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": password,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["user_id"].as_str().unwrap().to_string()
    }

    /// Log `username` in and return the access token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/auth/login",
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["access_token"].as_str().unwrap().to_string()
    }
}
