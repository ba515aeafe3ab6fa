//! JWT claims structure used in access tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID, carrying the server-side session id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Subject, the username.
    pub sub: String,
    /// Roles granted to the subject.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Claims for `username` bound to `session_id`, valid for `ttl_seconds`
    /// from now.
    pub fn for_session(
        session_id: impl Into<String>,
        username: impl Into<String>,
        roles: Vec<String>,
        ttl_seconds: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            jti: Some(session_id.into()),
            sub: username.into(),
            roles,
            iat: now.timestamp(),
            exp: now.timestamp() + ttl_seconds as i64,
            iss: None,
        }
    }
}

/// Claims of a token that passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedToken {
    /// The `sub` claim.
    pub subject: String,
    /// The `roles` claim.
    pub roles: Vec<String>,
    /// The `jti` claim, if present.
    pub session_id: Option<String>,
}

impl From<Claims> for ValidatedToken {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            roles: claims.roles,
            session_id: claims.jti.filter(|jti| !jti.is_empty()),
        }
    }
}
