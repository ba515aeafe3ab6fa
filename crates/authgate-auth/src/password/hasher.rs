//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;

use super::CredentialVerifier;

/// [`CredentialVerifier`] using Argon2id with a random salt per hash.
#[derive(Debug, Clone, Default)]
pub struct Argon2Verifier;

impl Argon2Verifier {
    /// Creates a verifier with the default Argon2id parameters.
    pub fn new() -> Self {
        Self
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            AppError::new(ErrorKind::Internal, format!("Invalid password hash format: {e}"))
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let verifier = Argon2Verifier::new();
        let hash = verifier.hash("s3cret!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verifier.verify("s3cret!", &hash).unwrap());
        assert!(!verifier.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let verifier = Argon2Verifier::new();
        assert_ne!(verifier.hash("pw").unwrap(), verifier.hash("pw").unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let verifier = Argon2Verifier::new();
        let err = verifier.verify("pw", "not-a-phc-string").unwrap_err();
        assert!(err.is(ErrorKind::Internal));
    }
}
