//! Session store backed by a [`CacheProvider`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use authgate_cache::keys;
use authgate_core::config::SessionConfig;
use authgate_core::result::AppResult;
use authgate_core::traits::CacheProvider;

use super::SessionStore;

/// Stores `<prefix><session id> -> user id` entries with a sliding TTL.
#[derive(Debug, Clone)]
pub struct CacheSessionStore {
    /// Backing key/value store.
    cache: Arc<dyn CacheProvider>,
    /// Session configuration.
    config: SessionConfig,
}

impl CacheSessionStore {
    /// Creates a new session store.
    pub fn new(cache: Arc<dyn CacheProvider>, config: SessionConfig) -> Self {
        Self { cache, config }
    }

    fn key(&self, session_id: &str) -> String {
        keys::session(&self.config.key_prefix, session_id)
    }
}

#[async_trait]
impl SessionStore for CacheSessionStore {
    async fn create(&self, username: &str, user_id: &str) -> AppResult<String> {
        let session_id = Uuid::new_v4().to_string();
        self.cache
            .set(&self.key(&session_id), user_id, self.config.ttl())
            .await?;

        info!(session_id = %session_id, username = %username, "Created session");
        Ok(session_id)
    }

    async fn validate(&self, session_id: &str) -> AppResult<Option<String>> {
        let key = self.key(session_id);
        let Some(user_id) = self.cache.get(&key).await? else {
            return Ok(None);
        };

        // Read and refresh are separate calls. If the session is removed in
        // between, this validation still succeeds and the next one fails.
        if !self.cache.expire(&key, self.config.ttl()).await? {
            debug!(session_id = %session_id, "Session vanished before its TTL was refreshed");
        }
        Ok(Some(user_id))
    }

    async fn invalidate(&self, session_id: &str) -> AppResult<bool> {
        let key = self.key(session_id);
        let existed = self.cache.exists(&key).await?;
        self.cache.delete(&key).await?;

        info!(session_id = %session_id, existed, "Invalidated session");
        Ok(existed)
    }

    fn ttl(&self) -> Duration {
        self.config.ttl()
    }
}
