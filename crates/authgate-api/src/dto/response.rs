//! Response DTOs.

use serde::{Deserialize, Serialize};

use authgate_auth::{LoginOutcome, RegisterOutcome, VerifyOutcome};
use authgate_bus::BridgeMetricsSnapshot;

/// Login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub access_token: String,
    /// Session lifetime in seconds.
    pub expires_in: u64,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            access_token: outcome.access_token,
            expires_in: outcome.expires_in,
        }
    }
}

/// Registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Id assigned by the persistence service.
    pub user_id: String,
    /// Registered username.
    pub username: String,
    /// `"CREATED"`.
    pub status: String,
}

impl From<RegisterOutcome> for RegisterResponse {
    fn from(outcome: RegisterOutcome) -> Self {
        Self {
            user_id: outcome.user_id,
            username: outcome.username,
            status: outcome.status,
        }
    }
}

/// Verification response. Only `valid` is set for rejected tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the token and its session are valid.
    pub valid: bool,
    /// Token subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// User id stored with the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Roles carried by the token.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl From<VerifyOutcome> for VerifyResponse {
    fn from(outcome: VerifyOutcome) -> Self {
        match outcome {
            VerifyOutcome::Valid {
                username,
                user_id,
                roles,
            } => Self {
                valid: true,
                username: Some(username),
                user_id: Some(user_id),
                roles,
            },
            VerifyOutcome::Invalid { .. } => Self {
                valid: false,
                username: None,
                user_id: None,
                roles: Vec::new(),
            },
        }
    }
}

/// Logout response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Whether a live session was removed.
    pub revoked: bool,
}

/// Health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Session store reachability.
    pub cache: String,
    /// Correlation bridge counters.
    pub bridge: BridgeMetricsSnapshot,
}
