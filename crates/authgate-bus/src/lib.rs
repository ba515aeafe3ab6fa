//! # authgate-bus
//!
//! Turns a fire-and-forget message bus into a per-caller request/response
//! contract.
//!
//! ## Modules
//!
//! - `registry`: correlation id to a single-resolution pending entry
//! - `producer`: publishes enveloped requests (the request channel)
//! - `consumer`: subscription loop resolving pending entries (the reply channel)
//! - `client`: "publish, then await the matching reply or time out"
//! - `transport`: in-memory and Redis pub/sub bus implementations
//! - `metrics`: bridge counters

pub mod client;
pub mod consumer;
pub mod error;
pub mod metrics;
pub mod producer;
pub mod registry;
pub mod transport;

pub use client::RequestReplyClient;
pub use consumer::{DispatchOutcome, ReplyListener};
pub use error::BusError;
pub use metrics::{BridgeMetrics, BridgeMetricsSnapshot};
pub use producer::RequestChannel;
pub use registry::{CorrelationKey, CorrelationRegistry, PendingHandle};
pub use transport::{BusMessage, MessagePublisher, MessageSubscriber, Subscription};

/// Reply type routed through the bridge.
pub type Reply = authgate_core::events::UserEvent;
