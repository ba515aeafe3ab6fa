//! Results of the authentication flows.

use serde::{Deserialize, Serialize};

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// Signed bearer token bound to the new session.
    pub access_token: String,
    /// Session lifetime in seconds.
    pub expires_in: u64,
}

/// Successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOutcome {
    /// Id assigned by the persistence service.
    pub user_id: String,
    /// The registered username.
    pub username: String,
    /// Always `"CREATED"`.
    pub status: String,
}

/// Result of checking a bearer token. "Not valid" is a result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The token is authentic and its session is live.
    Valid {
        /// The token subject.
        username: String,
        /// User id stored with the session.
        user_id: String,
        /// Roles carried by the token.
        roles: Vec<String>,
    },
    /// The token or its session was rejected.
    Invalid {
        /// Why it was rejected.
        reason: String,
    },
}

impl VerifyOutcome {
    /// Build an invalid outcome.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    /// Whether the token was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Result of a logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutOutcome {
    /// Whether a live session was removed.
    pub revoked: bool,
}
