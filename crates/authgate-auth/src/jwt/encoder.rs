//! JWT token creation.

use jsonwebtoken::{EncodingKey, Header, encode};

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;

use super::TokenIssuer;
use super::claims::Claims;

/// Signs access tokens with HMAC-SHA256.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Issuer stamped on every token, if configured.
    issuer: Option<String>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
        }
    }
}

impl TokenIssuer for JwtEncoder {
    fn issue(&self, claims: &Claims) -> AppResult<String> {
        let token = match (&claims.iss, &self.issuer) {
            (None, Some(issuer)) => {
                let stamped = Claims {
                    iss: Some(issuer.clone()),
                    ..claims.clone()
                };
                encode(&Header::default(), &stamped, &self.encoding_key)
            }
            _ => encode(&Header::default(), claims, &self.encoding_key),
        };

        token.map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }
}
