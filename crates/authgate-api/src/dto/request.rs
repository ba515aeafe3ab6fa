//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Requested username.
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of `Verify` and `Logout`.
///
/// No field rules: an empty or missing token is a verification result
/// (`valid: false`), not a malformed request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenRequest {
    /// Bearer token.
    #[serde(default)]
    pub token: String,
}
