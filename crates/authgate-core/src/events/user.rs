//! User lookup and creation messages.

use serde::{Deserialize, Serialize};

/// Asks the persistence service for a user by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFindRequest {
    /// The username to look up.
    pub username: String,
}

/// Asks the persistence service to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    /// The requested username.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// Password hash produced by the gateway; plaintext never leaves it.
    pub password_hash: String,
}

/// Outcome reported by the persistence service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserEventKind {
    /// The requested user exists.
    Found,
    /// No user with that name exists.
    NotFound,
    /// The user was created.
    Created,
    /// The request failed (for creation: the user or email already exists).
    Error,
}

/// Reply produced by the persistence service. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    /// Numeric user id, when the user exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Username the event refers to.
    #[serde(default)]
    pub username: String,
    /// Email address, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Stored password hash, when the user exists.
    #[serde(default, alias = "password", skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// What happened.
    #[serde(alias = "type")]
    pub kind: UserEventKind,
    /// Free-form detail, set on errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UserEvent {
    /// A `FOUND` event carrying the stored credentials.
    pub fn found(id: i64, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            email: None,
            password_hash: Some(password_hash.into()),
            kind: UserEventKind::Found,
            message: None,
        }
    }

    /// A `NOT_FOUND` event.
    pub fn not_found(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            password_hash: None,
            kind: UserEventKind::NotFound,
            message: None,
        }
    }

    /// A `CREATED` event.
    pub fn created(id: i64, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            email: Some(email.into()),
            password_hash: None,
            kind: UserEventKind::Created,
            message: None,
        }
    }

    /// An `ERROR` event with a downstream message.
    pub fn error(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            password_hash: None,
            kind: UserEventKind::Error,
            message: Some(message.into()),
        }
    }
}
