//! Session management configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sliding session lifetime in seconds, reset on every successful verify.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Prefix of session keys in the store (`session:<id>`).
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Interval between purges of expired entries in the memory backend.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            key_prefix: default_key_prefix(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl SessionConfig {
    /// Returns the session TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

fn default_ttl() -> u64 {
    1800
}

fn default_key_prefix() -> String {
    "session:".to_string()
}

fn default_sweep_interval() -> u64 {
    60
}
