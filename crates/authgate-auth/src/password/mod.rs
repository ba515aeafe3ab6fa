//! Credential hashing and verification.

pub mod hasher;

pub use hasher::Argon2Verifier;

use authgate_core::result::AppResult;

/// Hashes new passwords and checks supplied passwords against stored hashes.
///
/// Plaintext passwords are only ever seen by implementations of this trait.
pub trait CredentialVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> AppResult<String>;

    /// Returns `Ok(true)` if `password` matches `hash`, `Ok(false)` if not.
    /// Errors are reserved for unusable hashes or primitive failures.
    fn verify(&self, password: &str, hash: &str) -> AppResult<bool>;
}
