//! Key/value store trait for pluggable session backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for key/value backends (Redis or in-memory).
///
/// Values are plain strings. Providers are responsible for key prefixing and
/// TTL enforcement. No operation is transactional across calls.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Reset the TTL on an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Remaining lifetime of a key. `None` if the key is absent.
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
