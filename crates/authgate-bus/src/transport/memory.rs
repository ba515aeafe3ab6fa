//! In-process topic bus.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::trace;

use super::{BusMessage, MessagePublisher, MessageSubscriber, Subscription};
use crate::error::BusError;

/// Topic bus living inside the process.
///
/// Every subscriber of a topic receives every message published on it.
/// Messages published on a topic nobody listens to are discarded, like on a
/// real broker without consumers.
#[derive(Debug, Clone)]
pub struct InMemoryBus {
    subscribers: Arc<DashMap<String, Vec<mpsc::Sender<BusMessage>>>>,
    capacity: usize,
}

impl InMemoryBus {
    /// Create a bus whose subscriptions buffer up to `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers
            .get(topic)
            .map(|subs| subs.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl MessagePublisher for InMemoryBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        // Clone the senders so no map guard is held across an await.
        let senders: Vec<mpsc::Sender<BusMessage>> = match self.subscribers.get_mut(topic) {
            Some(mut subs) => {
                subs.retain(|tx| !tx.is_closed());
                subs.clone()
            }
            None => Vec::new(),
        };

        trace!(topic, subscribers = senders.len(), "Publishing message");

        let message = BusMessage {
            topic: topic.to_string(),
            payload,
        };
        for tx in senders {
            // A subscriber dropping mid-publish is not the publisher's failure.
            let _ = tx.send(message.clone()).await;
        }
        Ok(())
    }
}

#[async_trait]
impl MessageSubscriber for InMemoryBus {
    async fn subscribe(&self, topic: &str) -> Result<Subscription, BusError> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers
            .entry(topic.to_string())
            .or_default()
            .push(tx);
        Ok(Subscription::new(topic, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_out_to_all_subscribers() {
        let bus = InMemoryBus::new(8);
        let mut a = bus.subscribe("t").await.unwrap();
        let mut b = bus.subscribe("t").await.unwrap();
        let mut other = bus.subscribe("u").await.unwrap();

        bus.publish("t", b"hello".to_vec()).await.unwrap();

        assert_eq!(a.next().await.unwrap().payload, b"hello");
        assert_eq!(b.next().await.unwrap().payload, b"hello");
        assert!(other.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let bus = InMemoryBus::default();
        bus.publish("nobody", b"x".to_vec()).await.unwrap();
        assert_eq!(bus.subscriber_count("nobody"), 0);
    }

    #[tokio::test]
    async fn test_dropped_subscription_is_pruned() {
        let bus = InMemoryBus::new(4);
        let sub = bus.subscribe("t").await.unwrap();
        assert_eq!(bus.subscriber_count("t"), 1);
        drop(sub);

        bus.publish("t", b"x".to_vec()).await.unwrap();
        assert_eq!(bus.subscriber_count("t"), 0);
    }
}
