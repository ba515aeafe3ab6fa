//! # authgate-auth
//!
//! Authentication flows for the AuthGate gateway.
//!
//! ## Modules
//!
//! - `orchestrator`: login, register, verify and logout flows
//! - `session`: server-side sessions with sliding expiration
//! - `password`: Argon2id credential hashing and verification
//! - `jwt`: bearer token issuing and validation
//! - `directory`: user lookup and creation through the message bus

pub mod directory;
pub mod jwt;
pub mod orchestrator;
pub mod password;
pub mod session;

pub use directory::{BusUserDirectory, UserDirectory};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenIssuer, TokenValidator, ValidatedToken};
pub use orchestrator::{
    AuthOrchestrator, LoginOutcome, LogoutOutcome, RegisterOutcome, VerifyOutcome,
};
pub use password::{Argon2Verifier, CredentialVerifier};
pub use session::{CacheSessionStore, SessionStore};
