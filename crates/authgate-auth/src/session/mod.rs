//! Server-side sessions with sliding expiration.

pub mod store;

pub use store::CacheSessionStore;

use std::time::Duration;

use async_trait::async_trait;

use authgate_core::result::AppResult;

/// Creates, validates and invalidates sessions.
///
/// A session is valid if and only if it exists in the store and has not
/// outlived its TTL since it was last validated.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open a session for `user_id` and return its opaque id.
    async fn create(&self, username: &str, user_id: &str) -> AppResult<String>;

    /// Look up a session. A live session has its TTL reset to the full
    /// window and its user id returned; an absent or expired one yields
    /// `None`.
    async fn validate(&self, session_id: &str) -> AppResult<Option<String>>;

    /// Remove a session. Returns whether it existed.
    async fn invalidate(&self, session_id: &str) -> AppResult<bool>;

    /// Lifetime granted by `create` and restored by `validate`.
    fn ttl(&self) -> Duration;
}
