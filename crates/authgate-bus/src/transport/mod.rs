//! Bus transports.
//!
//! A transport moves opaque payloads between topics. Publishing is
//! fire-and-forget; subscribing yields a [`Subscription`] whose messages are
//! consumed by a single loop.

pub mod memory;
#[cfg(feature = "redis-pubsub")]
pub mod redis;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::BusError;

pub use memory::InMemoryBus;
#[cfg(feature = "redis-pubsub")]
pub use self::redis::RedisBus;

/// A message as delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    /// Topic the message was published on.
    pub topic: String,
    /// Raw payload (JSON).
    pub payload: Vec<u8>,
}

/// Sends payloads to a topic.
#[async_trait]
pub trait MessagePublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Publish `payload` on `topic`. Delivery is not acknowledged.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError>;
}

/// Opens subscriptions to a topic.
#[async_trait]
pub trait MessageSubscriber: Send + Sync + std::fmt::Debug + 'static {
    /// Subscribe to `topic`.
    async fn subscribe(&self, topic: &str) -> Result<Subscription, BusError>;
}

/// A live subscription to one topic.
#[derive(Debug)]
pub struct Subscription {
    topic: String,
    receiver: mpsc::Receiver<BusMessage>,
}

impl Subscription {
    /// Wrap a delivery queue.
    pub fn new(topic: impl Into<String>, receiver: mpsc::Receiver<BusMessage>) -> Self {
        Self {
            topic: topic.into(),
            receiver,
        }
    }

    /// The subscribed topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next delivered message, or `None` once the transport side is gone.
    pub async fn next(&mut self) -> Option<BusMessage> {
        self.receiver.recv().await
    }
}
