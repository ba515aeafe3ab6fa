//! Request/reply client: publish a request, then wait for the one reply
//! that matches it or give up at the deadline.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::Reply;
use crate::error::BusError;
use crate::metrics::{BridgeMetrics, BridgeMetricsSnapshot};
use crate::producer::RequestChannel;
use crate::registry::{CorrelationKey, CorrelationRegistry};

/// Correlated request/reply over a fire-and-forget bus.
#[derive(Debug, Clone)]
pub struct RequestReplyClient {
    registry: Arc<CorrelationRegistry<Reply>>,
    channel: RequestChannel,
    metrics: Arc<BridgeMetrics>,
    default_timeout: Duration,
}

impl RequestReplyClient {
    /// Create a client sharing `registry` and `metrics` with the reply listener.
    pub fn new(
        registry: Arc<CorrelationRegistry<Reply>>,
        channel: RequestChannel,
        metrics: Arc<BridgeMetrics>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            channel,
            metrics,
            default_timeout,
        }
    }

    /// Deadline applied by [`send`](Self::send).
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Counters plus the current number of pending requests.
    pub fn metrics(&self) -> BridgeMetricsSnapshot {
        self.metrics.snapshot(self.registry.pending_count())
    }

    /// Publish `payload` to `topic` with a fresh correlation id and wait for
    /// the reply for at most the default timeout.
    pub async fn send<P: Serialize + Sync>(&self, topic: &str, payload: &P) -> Result<Reply, BusError> {
        self.request(CorrelationKey::generate(), topic, payload, self.default_timeout)
            .await
    }

    /// Publish `payload` to `topic` under `key` and wait up to `timeout` for
    /// the matching reply.
    ///
    /// The pending entry is registered before publishing, so a reply that
    /// arrives immediately is never missed. On every exit path the entry is
    /// gone from the registry.
    pub async fn request<P: Serialize + Sync>(
        &self,
        key: CorrelationKey,
        topic: &str,
        payload: &P,
        timeout: Duration,
    ) -> Result<Reply, BusError> {
        let mut handle = self.registry.register(key.clone())?;

        if let Err(e) = self.channel.publish(topic, &key, payload).await {
            self.registry.expire(&key);
            BridgeMetrics::inc(&self.metrics.dispatch_failures);
            warn!(topic, correlation_id = %key, error = %e, "Failed to publish request");
            return Err(match e {
                BusError::DispatchFailed { .. } => e,
                other => BusError::dispatch(topic, other),
            });
        }
        BridgeMetrics::inc(&self.metrics.requests_published);

        match handle.wait_for(timeout).await? {
            Some(reply) => Ok(reply),
            None => {
                if !self.registry.expire(&key) {
                    // The listener won the race against the deadline.
                    if let Some(reply) = handle.try_take() {
                        debug!(correlation_id = %key, "Reply arrived at the deadline");
                        return Ok(reply);
                    }
                }
                BridgeMetrics::inc(&self.metrics.timeouts);
                warn!(topic, correlation_id = %key, timeout_ms = timeout.as_millis() as u64, "Request timed out");
                Err(BusError::Timeout { key, timeout })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::watch;

    use super::*;
    use crate::consumer::ReplyListener;
    use crate::transport::{InMemoryBus, MessagePublisher, MessageSubscriber};
    use authgate_core::events::{RequestEnvelope, ReplyEnvelope, UserEvent, UserFindRequest};

    const FIND: &str = "requests.user.find";
    const REPLIES: &str = "replies.user.events";

    #[derive(Debug)]
    struct FailingPublisher;

    #[async_trait]
    impl MessagePublisher for FailingPublisher {
        async fn publish(&self, topic: &str, _payload: Vec<u8>) -> Result<(), BusError> {
            Err(BusError::dispatch(topic, "broker unavailable"))
        }
    }

    fn client_over(publisher: Arc<dyn MessagePublisher>) -> (RequestReplyClient, Arc<CorrelationRegistry<Reply>>, Arc<BridgeMetrics>) {
        let registry = Arc::new(CorrelationRegistry::new());
        let metrics = Arc::new(BridgeMetrics::new());
        let client = RequestReplyClient::new(
            Arc::clone(&registry),
            RequestChannel::new(publisher, REPLIES),
            Arc::clone(&metrics),
            Duration::from_secs(5),
        );
        (client, registry, metrics)
    }

    fn find(username: &str) -> UserFindRequest {
        UserFindRequest {
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_failure_leaves_no_pending_entry() {
        let (client, registry, metrics) = client_over(Arc::new(FailingPublisher));

        let err = client.send(FIND, &find("alice")).await.unwrap_err();
        assert!(matches!(err, BusError::DispatchFailed { .. }));
        assert_eq!(registry.pending_count(), 0);
        assert_eq!(metrics.snapshot(0).dispatch_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_then_late_reply_is_noop() {
        let bus = Arc::new(InMemoryBus::new(8));
        let (client, registry, metrics) = client_over(bus);
        let key = CorrelationKey::from("late-1");

        let err = client
            .request(key.clone(), FIND, &find("alice"), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, BusError::Timeout { .. }));
        assert!(!registry.is_pending(&key));

        assert!(!registry.complete(&key, UserEvent::not_found("alice")));
        let snapshot = metrics.snapshot(registry.pending_count());
        assert_eq!(snapshot.timeouts, 1);
        assert_eq!(snapshot.pending, 0);
    }

    #[tokio::test]
    async fn test_duplicate_key_fails_fast() {
        let bus = Arc::new(InMemoryBus::new(8));
        let (client, registry, _) = client_over(bus);
        let key = CorrelationKey::from("dup");
        let _held = registry.register(key.clone()).unwrap();

        let err = client
            .request(key, FIND, &find("alice"), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, BusError::DuplicateCorrelation(_)));
        assert_eq!(registry.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_through_in_memory_bus() {
        let bus = Arc::new(InMemoryBus::new(8));
        let (client, registry, metrics) = client_over(bus.clone());

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let replies = bus.subscribe(REPLIES).await.unwrap();
        let listener = ReplyListener::new(Arc::clone(&registry), Arc::clone(&metrics));
        let listener_task = tokio::spawn(listener.run(replies, cancel_rx));

        // Stand-in persistence service answering every lookup.
        let mut requests = bus.subscribe(FIND).await.unwrap();
        let responder_bus = bus.clone();
        tokio::spawn(async move {
            while let Some(msg) = requests.next().await {
                let request: RequestEnvelope<UserFindRequest> =
                    serde_json::from_slice(&msg.payload).unwrap();
                let reply = ReplyEnvelope {
                    correlation_id: Some(request.correlation_id),
                    event: UserEvent::found(42, request.payload.username, "hash"),
                };
                responder_bus
                    .publish(&request.reply_to, serde_json::to_vec(&reply).unwrap())
                    .await
                    .unwrap();
            }
        });

        let find_alice = find("alice");
        let find_bob = find("bob");
        let (alice, bob) = tokio::join!(
            client.send(FIND, &find_alice),
            client.send(FIND, &find_bob)
        );
        assert_eq!(alice.unwrap().username, "alice");
        assert_eq!(bob.unwrap().username, "bob");

        let snapshot = client.metrics();
        assert_eq!(snapshot.requests_published, 2);
        assert_eq!(snapshot.replies_matched, 2);
        assert_eq!(snapshot.pending, 0);

        cancel_tx.send(true).unwrap();
        listener_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_fails_in_flight_request() {
        let bus = Arc::new(InMemoryBus::new(8));
        let (client, registry, _) = client_over(bus);

        let in_flight = {
            let client = client.clone();
            tokio::spawn(async move { client.send(FIND, &find("alice")).await })
        };
        while registry.pending_count() == 0 {
            tokio::task::yield_now().await;
        }
        registry.shutdown();

        assert!(matches!(in_flight.await.unwrap(), Err(BusError::Closed)));
        assert!(matches!(
            client.send(FIND, &find("bob")).await,
            Err(BusError::Closed)
        ));
    }
}
