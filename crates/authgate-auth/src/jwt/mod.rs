//! Bearer token issuing and validation.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, ValidatedToken};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;

use async_trait::async_trait;

use authgate_core::result::AppResult;

/// Mints signed bearer tokens.
pub trait TokenIssuer: Send + Sync + std::fmt::Debug + 'static {
    /// Sign `claims` into a compact token.
    fn issue(&self, claims: &Claims) -> AppResult<String>;
}

/// Checks bearer tokens.
#[async_trait]
pub trait TokenValidator: Send + Sync + std::fmt::Debug + 'static {
    /// Validate signature and expiry of `token` and return its claims.
    ///
    /// A token that is malformed, forged or expired yields an
    /// `Unauthenticated` error carrying the reason. Any other error kind is
    /// an internal fault.
    async fn validate(&self, token: &str) -> AppResult<ValidatedToken>;
}
