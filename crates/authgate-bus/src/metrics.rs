//! Bridge counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters describing traffic through the correlation bridge.
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    /// Requests handed to the bus.
    pub requests_published: AtomicU64,
    /// Replies that resolved a pending request.
    pub replies_matched: AtomicU64,
    /// Replies with no pending request (late, duplicate or foreign).
    pub replies_dropped: AtomicU64,
    /// Replies that could not be decoded.
    pub replies_malformed: AtomicU64,
    /// Requests whose deadline elapsed.
    pub timeouts: AtomicU64,
    /// Requests that could not be published.
    pub dispatch_failures: AtomicU64,
}

impl BridgeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters, with the current pending count.
    pub fn snapshot(&self, pending: usize) -> BridgeMetricsSnapshot {
        BridgeMetricsSnapshot {
            requests_published: self.requests_published.load(Ordering::Relaxed),
            replies_matched: self.replies_matched.load(Ordering::Relaxed),
            replies_dropped: self.replies_dropped.load(Ordering::Relaxed),
            replies_malformed: self.replies_malformed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            dispatch_failures: self.dispatch_failures.load(Ordering::Relaxed),
            pending: pending as u64,
        }
    }
}

/// Serializable snapshot of [`BridgeMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMetricsSnapshot {
    /// Requests handed to the bus.
    pub requests_published: u64,
    /// Replies that resolved a pending request.
    pub replies_matched: u64,
    /// Replies with no pending request.
    pub replies_dropped: u64,
    /// Replies that could not be decoded.
    pub replies_malformed: u64,
    /// Requests whose deadline elapsed.
    pub timeouts: u64,
    /// Requests that could not be published.
    pub dispatch_failures: u64,
    /// Requests currently awaiting a reply.
    pub pending: u64,
}
