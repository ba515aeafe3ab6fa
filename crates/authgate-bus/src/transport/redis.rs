//! Redis pub/sub transport for multi-process deployments.

use async_trait::async_trait;
use futures::StreamExt;
use redis::Client;
use redis::aio::ConnectionManager;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{BusMessage, MessagePublisher, MessageSubscriber, Subscription};
use crate::error::BusError;

/// Topic bus backed by Redis `PUBLISH`/`SUBSCRIBE`.
///
/// Publishing goes through a shared reconnecting connection. Each
/// subscription opens its own pub/sub connection and forwards payloads
/// into a bounded queue from a background task.
#[derive(Clone)]
pub struct RedisBus {
    client: Client,
    conn: ConnectionManager,
    capacity: usize,
}

impl std::fmt::Debug for RedisBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBus")
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl RedisBus {
    /// Connect to the Redis server at `url`.
    pub async fn connect(url: &str, capacity: usize) -> Result<Self, BusError> {
        let client = Client::open(url).map_err(|e| BusError::dispatch("redis", e))?;
        let conn = ConnectionManager::new(client.clone())
            .await
            .map_err(|e| BusError::dispatch("redis", e))?;

        info!("Connected Redis pub/sub transport");
        Ok(Self {
            client,
            conn,
            capacity: capacity.max(1),
        })
    }
}

#[async_trait]
impl MessagePublisher for RedisBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        let mut conn = self.conn.clone();
        let receivers = redis::cmd("PUBLISH")
            .arg(topic)
            .arg(payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| BusError::dispatch(topic, format!("Redis PUBLISH failed: {e}")))?;

        debug!(topic, receivers, "Published message");
        Ok(())
    }
}

#[async_trait]
impl MessageSubscriber for RedisBus {
    async fn subscribe(&self, topic: &str) -> Result<Subscription, BusError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| BusError::dispatch(topic, format!("Redis pub/sub connection failed: {e}")))?;
        pubsub
            .subscribe(topic)
            .await
            .map_err(|e| BusError::dispatch(topic, format!("Redis SUBSCRIBE failed: {e}")))?;

        let (tx, rx) = mpsc::channel(self.capacity);
        let topic_name = topic.to_string();

        tokio::spawn(async move {
            let mut messages = pubsub.into_on_message();
            while let Some(msg) = messages.next().await {
                let payload: Vec<u8> = match msg.get_payload() {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(topic = %topic_name, error = %e, "Discarding unreadable pub/sub payload");
                        continue;
                    }
                };
                let message = BusMessage {
                    topic: msg.get_channel_name().to_string(),
                    payload,
                };
                if tx.send(message).await.is_err() {
                    break;
                }
            }
            debug!(topic = %topic_name, "Redis subscription closed");
        });

        info!(topic, "Subscribed to Redis channel");
        Ok(Subscription::new(topic, rx))
    }
}
