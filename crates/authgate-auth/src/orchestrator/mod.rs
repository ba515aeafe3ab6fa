//! The authentication orchestrator.
//!
//! Each flow is a sequence of hard gates over the collaborators: the user
//! directory (over the bus), the credential verifier, the session store and
//! the token issuer/validator. Bridge failures surface as `Internal` errors;
//! authentication outcomes map onto `Unauthenticated` and `AlreadyExists`.
//! Verification never fails for a bad token, only for internal faults.

mod outcome;

pub use outcome::{LoginOutcome, LogoutOutcome, RegisterOutcome, VerifyOutcome};

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use authgate_core::error::{AppError, ErrorKind};
use authgate_core::events::{UserCreateRequest, UserEventKind};
use authgate_core::result::AppResult;

use crate::directory::UserDirectory;
use crate::jwt::{Claims, TokenIssuer, TokenValidator};
use crate::password::CredentialVerifier;
use crate::session::SessionStore;

/// Runs login, register, verify and logout.
#[derive(Debug, Clone)]
pub struct AuthOrchestrator {
    directory: Arc<dyn UserDirectory>,
    credentials: Arc<dyn CredentialVerifier>,
    sessions: Arc<dyn SessionStore>,
    issuer: Arc<dyn TokenIssuer>,
    validator: Arc<dyn TokenValidator>,
    default_roles: Vec<String>,
    token_ttl: Duration,
}

impl AuthOrchestrator {
    /// Creates an orchestrator over the given collaborators.
    ///
    /// `token_ttl` bounds the `exp` claim only; session liveness is decided
    /// by the session store on every verify.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        credentials: Arc<dyn CredentialVerifier>,
        sessions: Arc<dyn SessionStore>,
        issuer: Arc<dyn TokenIssuer>,
        validator: Arc<dyn TokenValidator>,
        default_roles: Vec<String>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            directory,
            credentials,
            sessions,
            issuer,
            validator,
            default_roles,
            token_ttl,
        }
    }

    /// Authenticate `username` with `password` and open a session.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = self.directory.find_user(username).await.inspect_err(|e| {
            error!(username = %username, error = %e, "User lookup failed during login");
        })?;

        let stored_hash = match (&user.kind, &user.password_hash) {
            (UserEventKind::NotFound, _) | (_, None) => {
                warn!(username = %username, "Login rejected: user not found");
                return Err(AppError::unauthenticated("Invalid credentials: user not found"));
            }
            (_, Some(hash)) => hash,
        };

        if !self.credentials.verify(password, stored_hash)? {
            warn!(username = %username, "Login rejected: bad password");
            return Err(AppError::unauthenticated("Invalid credentials: bad password"));
        }

        let user_id = user.id.map(|id| id.to_string()).unwrap_or_default();
        let session_id = self.sessions.create(username, &user_id).await?;

        let claims = Claims::for_session(
            &session_id,
            username,
            self.default_roles.clone(),
            self.token_ttl.as_secs(),
        );
        let access_token = match self.issuer.issue(&claims) {
            Ok(token) => token,
            Err(e) => {
                error!(username = %username, error = %e, "Token issuing failed");
                // Do not leave an unreachable session behind.
                if let Err(cleanup) = self.sessions.invalidate(&session_id).await {
                    warn!(
                        username = %username,
                        error = %cleanup,
                        "Failed to drop session after token issuing failed"
                    );
                }
                return Err(AppError::with_source(
                    ErrorKind::Internal,
                    "Failed to generate token",
                    e,
                ));
            }
        };

        info!(username = %username, "Login succeeded");
        Ok(LoginOutcome {
            access_token,
            expires_in: self.sessions.ttl().as_secs(),
        })
    }

    /// Create a user with a freshly hashed password.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<RegisterOutcome> {
        let request = UserCreateRequest {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.credentials.hash(password)?,
        };

        let reply = self.directory.create_user(&request).await.inspect_err(|e| {
            error!(username = %username, error = %e, "User creation failed");
        })?;

        if reply.kind == UserEventKind::Error {
            let detail = reply.message.unwrap_or_default();
            warn!(username = %username, detail = %detail, "Registration rejected");
            return Err(AppError::already_exists(format!(
                "User creation failed: {detail}"
            )));
        }

        info!(username = %username, "User registered");
        Ok(RegisterOutcome {
            user_id: reply.id.map(|id| id.to_string()).unwrap_or_default(),
            username: if reply.username.is_empty() {
                request.username
            } else {
                reply.username
            },
            status: "CREATED".to_string(),
        })
    }

    /// Check a bearer token and slide its session's expiration.
    pub async fn verify(&self, token: &str) -> AppResult<VerifyOutcome> {
        let validated = match self.validator.validate(token).await {
            Ok(validated) => validated,
            Err(e) if e.is(ErrorKind::Unauthenticated) => {
                warn!(reason = %e.message, "Token verification failed");
                return Ok(VerifyOutcome::invalid(format!("Invalid token: {}", e.message)));
            }
            Err(e) => return Err(e),
        };

        let Some(session_id) = validated.session_id else {
            warn!(username = %validated.subject, "Token verification failed: missing session claim");
            return Ok(VerifyOutcome::invalid("missing session claim"));
        };

        match self.sessions.validate(&session_id).await? {
            Some(user_id) => Ok(VerifyOutcome::Valid {
                username: validated.subject,
                user_id,
                roles: validated.roles,
            }),
            None => {
                warn!(username = %validated.subject, "Token verification failed: session expired or revoked");
                Ok(VerifyOutcome::invalid("session expired or revoked"))
            }
        }
    }

    /// Revoke the session a token is bound to.
    pub async fn logout(&self, token: &str) -> AppResult<LogoutOutcome> {
        let validated = match self.validator.validate(token).await {
            Ok(validated) => validated,
            Err(e) if e.is(ErrorKind::Unauthenticated) => {
                return Ok(LogoutOutcome { revoked: false });
            }
            Err(e) => return Err(e),
        };

        let revoked = match validated.session_id {
            Some(session_id) => self.sessions.invalidate(&session_id).await?,
            None => false,
        };

        info!(username = %validated.subject, revoked, "Logout");
        Ok(LogoutOutcome { revoked })
    }
}
