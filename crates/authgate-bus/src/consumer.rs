//! Reply channel: routes inbound replies to their pending requests.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use authgate_core::events::ReplyEnvelope;

use crate::Reply;
use crate::metrics::BridgeMetrics;
use crate::registry::{CorrelationKey, CorrelationRegistry};
use crate::transport::{BusMessage, Subscription};

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The reply resolved a pending request.
    Matched,
    /// No pending request matched (late, duplicate, foreign or uncorrelated).
    Unmatched,
    /// The payload could not be decoded.
    Malformed,
}

/// Consumes the reply topic and completes pending requests.
///
/// The listener never blocks on a waiter: completion only writes the
/// waiter's slot.
#[derive(Debug, Clone)]
pub struct ReplyListener {
    registry: Arc<CorrelationRegistry<Reply>>,
    metrics: Arc<BridgeMetrics>,
}

impl ReplyListener {
    /// Create a listener resolving entries of `registry`.
    pub fn new(registry: Arc<CorrelationRegistry<Reply>>, metrics: Arc<BridgeMetrics>) -> Self {
        Self { registry, metrics }
    }

    /// Route one inbound message.
    pub fn dispatch(&self, message: &BusMessage) -> DispatchOutcome {
        let envelope: ReplyEnvelope = match serde_json::from_slice(&message.payload) {
            Ok(env) => env,
            Err(e) => {
                warn!(topic = %message.topic, error = %e, "Dropping malformed reply");
                BridgeMetrics::inc(&self.metrics.replies_malformed);
                return DispatchOutcome::Malformed;
            }
        };

        let Some(correlation_id) = envelope.correlation_id else {
            debug!(topic = %message.topic, "Dropping reply without correlation id");
            BridgeMetrics::inc(&self.metrics.replies_dropped);
            return DispatchOutcome::Unmatched;
        };

        let key = CorrelationKey::from(correlation_id);
        if self.registry.complete(&key, envelope.event) {
            BridgeMetrics::inc(&self.metrics.replies_matched);
            DispatchOutcome::Matched
        } else {
            BridgeMetrics::inc(&self.metrics.replies_dropped);
            DispatchOutcome::Unmatched
        }
    }

    /// Consume `subscription` until `cancel` flips to `true` or the
    /// transport closes the subscription.
    pub async fn run(self, mut subscription: Subscription, mut cancel: watch::Receiver<bool>) {
        info!(topic = subscription.topic(), "Reply listener started");

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Reply listener received shutdown signal");
                        break;
                    }
                }
                message = subscription.next() => {
                    match message {
                        Some(message) => {
                            self.dispatch(&message);
                        }
                        None => {
                            warn!(topic = subscription.topic(), "Reply subscription closed");
                            break;
                        }
                    }
                }
            }
        }

        info!("Reply listener stopped");
    }
}
