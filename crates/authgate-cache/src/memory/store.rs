//! In-memory cache implementation backed by a sharded concurrent map.
//!
//! Every entry carries its own deadline so that `expire` can slide a single
//! key's lifetime and `ttl` can report what is left of it. Expired entries
//! are invisible to readers and removed lazily or by the [`ExpirySweeper`].
//!
//! [`ExpirySweeper`]: super::sweeper::ExpirySweeper

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use authgate_core::result::AppResult;
use authgate_core::traits::CacheProvider;

/// A stored value and the instant it stops being visible.
#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// In-memory cache provider.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheProvider {
    entries: Arc<DashMap<String, MemoryEntry>>,
}

impl MemoryCacheProvider {
    /// Create an empty in-memory provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Purged expired cache entries");
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let value = self
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone());

        if value.is_none() {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        value
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_value(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live_value(key).is_some())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired(now) => {
                entry.expires_at = now + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at.saturating_duration_since(now)))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get() {
        let provider = MemoryCacheProvider::new();
        provider
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = MemoryCacheProvider::new();
        provider
            .set("key2", "value2", Duration::from_secs(60))
            .await
            .unwrap();
        provider.delete("key2").await.unwrap();
        assert_eq!(provider.get("key2").await.unwrap(), None);
        provider.delete("never-set").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires() {
        let provider = MemoryCacheProvider::new();
        provider
            .set("short", "v", Duration::from_secs(10))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(provider.exists("short").await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!provider.exists("short").await.unwrap());
        assert_eq!(provider.ttl("short").await.unwrap(), None);
        assert!(provider.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_slides_deadline() {
        let provider = MemoryCacheProvider::new();
        provider
            .set("sliding", "v", Duration::from_secs(100))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(
            provider.ttl("sliding").await.unwrap(),
            Some(Duration::from_secs(40))
        );

        assert!(provider
            .expire("sliding", Duration::from_secs(100))
            .await
            .unwrap());
        assert_eq!(
            provider.ttl("sliding").await.unwrap(),
            Some(Duration::from_secs(100))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_missing_or_expired_key() {
        let provider = MemoryCacheProvider::new();
        assert!(!provider
            .expire("absent", Duration::from_secs(5))
            .await
            .unwrap());

        provider
            .set("gone", "v", Duration::from_secs(1))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!provider
            .expire("gone", Duration::from_secs(5))
            .await
            .unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let provider = MemoryCacheProvider::new();
        provider.set("a", "1", Duration::from_secs(1)).await.unwrap();
        provider.set("b", "2", Duration::from_secs(1)).await.unwrap();
        provider.set("c", "3", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(provider.purge_expired(), 2);
        assert_eq!(provider.len(), 1);
    }
}
