//! Message bus configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Message bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Bus transport: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis connection URL (used when `provider = "redis"`).
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// How long a caller waits for the matching reply, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Buffer size of each subscription's delivery queue.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Topic names (wire contract with the persistence service).
    #[serde(default)]
    pub topics: TopicConfig,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis_url: default_redis_url(),
            request_timeout_ms: default_request_timeout(),
            channel_capacity: default_channel_capacity(),
            topics: TopicConfig::default(),
        }
    }
}

impl BusConfig {
    /// Returns the reply wait deadline as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Topic names used on the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Topic for user lookups.
    #[serde(default = "default_find_topic")]
    pub find: String,
    /// Topic for user creation.
    #[serde(default = "default_create_topic")]
    pub create: String,
    /// Topic the persistence service publishes replies on.
    #[serde(default = "default_replies_topic")]
    pub replies: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            find: default_find_topic(),
            create: default_create_topic(),
            replies: default_replies_topic(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_find_topic() -> String {
    "requests.user.find".to_string()
}

fn default_create_topic() -> String {
    "requests.user.create".to_string()
}

fn default_replies_topic() -> String {
    "replies.user.events".to_string()
}
