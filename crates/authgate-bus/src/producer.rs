//! Request channel: publishes enveloped requests on the bus.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use authgate_core::events::RequestEnvelope;

use crate::error::BusError;
use crate::registry::CorrelationKey;
use crate::transport::MessagePublisher;

/// Fire-and-forget publisher of correlated requests.
///
/// Every request is wrapped in a [`RequestEnvelope`] carrying the
/// correlation id and the topic replies are expected on.
#[derive(Debug, Clone)]
pub struct RequestChannel {
    publisher: Arc<dyn MessagePublisher>,
    reply_topic: String,
}

impl RequestChannel {
    /// Create a channel publishing through `publisher`, asking for replies
    /// on `reply_topic`.
    pub fn new(publisher: Arc<dyn MessagePublisher>, reply_topic: impl Into<String>) -> Self {
        Self {
            publisher,
            reply_topic: reply_topic.into(),
        }
    }

    /// The topic replies are expected on.
    pub fn reply_topic(&self) -> &str {
        &self.reply_topic
    }

    /// Publish `payload` to `topic` under `key`.
    ///
    /// Success means the transport accepted the message, not that anything
    /// consumed it.
    pub async fn publish<P: Serialize>(
        &self,
        topic: &str,
        key: &CorrelationKey,
        payload: &P,
    ) -> Result<(), BusError> {
        let envelope = RequestEnvelope {
            correlation_id: key.to_string(),
            reply_to: self.reply_topic.clone(),
            payload,
        };
        let bytes = serde_json::to_vec(&envelope)?;

        debug!(topic, correlation_id = %key, "Publishing request");
        self.publisher.publish(topic, bytes).await
    }
}
