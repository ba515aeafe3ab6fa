//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Token signing and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Optional `iss` claim written to and required on tokens.
    #[serde(default)]
    pub jwt_issuer: Option<String>,
    /// Allowed clock skew when checking `exp`, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Roles granted to every authenticated user.
    #[serde(default = "default_roles")]
    pub default_roles: Vec<String>,
    /// Lifetime of the `exp` claim in seconds. Must outlast the session
    /// window, since the session, not the token, carries the sliding expiry.
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: None,
            leeway_seconds: default_leeway(),
            default_roles: default_roles(),
            access_token_ttl_seconds: default_access_token_ttl(),
        }
    }
}

impl AuthConfig {
    /// Returns the access token lifetime as a [`Duration`].
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_seconds)
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_roles() -> Vec<String> {
    vec!["USER".to_string()]
}

fn default_access_token_ttl() -> u64 {
    86_400
}
