//! Correlation registry: maps an outstanding request to the single reply
//! that may resolve it.
//!
//! Each pending entry owns the sending half of a oneshot channel, so its
//! completion slot can be written at most once. Every state transition
//! (`register`, `complete`, `expire`) is one atomic operation on the entry's
//! map shard, which gives the guarantees the bridge relies on:
//!
//! - a reply for an unknown, completed or expired key finds no entry and is dropped;
//! - `complete` and `expire` race on `remove`, so exactly one of them wins.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::error::BusError;

/// Identifier matching a reply to the request that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    /// Generate a fresh, unique key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CorrelationKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An outstanding request owned by the registry.
#[derive(Debug)]
struct PendingRequest<R> {
    completion: oneshot::Sender<R>,
    created_at: Instant,
}

/// Caller-side handle of a pending request.
#[derive(Debug)]
pub struct PendingHandle<R> {
    key: CorrelationKey,
    receiver: oneshot::Receiver<R>,
    created_at: Instant,
}

impl<R> PendingHandle<R> {
    /// The key this handle was registered under.
    pub fn key(&self) -> &CorrelationKey {
        &self.key
    }

    /// When the entry was registered.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Wait for the reply with no deadline.
    ///
    /// Fails with [`BusError::Closed`] if the entry was dropped without a
    /// reply (registry shutdown or expiry).
    pub async fn wait(self) -> Result<R, BusError> {
        self.receiver.await.map_err(|_| BusError::Closed)
    }

    /// Wait for the reply until `deadline` elapses.
    ///
    /// Returns `Ok(None)` on timeout; the handle stays usable so the caller
    /// can still [`try_take`](Self::try_take) a reply that raced the deadline.
    pub async fn wait_for(&mut self, deadline: std::time::Duration) -> Result<Option<R>, BusError> {
        match tokio::time::timeout(deadline, &mut self.receiver).await {
            Ok(Ok(reply)) => Ok(Some(reply)),
            Ok(Err(_)) => Err(BusError::Closed),
            Err(_) => Ok(None),
        }
    }

    /// Take a reply that has already been delivered, without waiting.
    pub fn try_take(&mut self) -> Option<R> {
        self.receiver.try_recv().ok()
    }
}

/// In-memory table of pending requests keyed by correlation id.
///
/// Created once by the composition root and shared through an `Arc`.
#[derive(Debug)]
pub struct CorrelationRegistry<R> {
    pending: DashMap<CorrelationKey, PendingRequest<R>>,
    closed: AtomicBool,
}

impl<R> Default for CorrelationRegistry<R> {
    fn default() -> Self {
        Self {
            pending: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }
}

impl<R> CorrelationRegistry<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending entry under `key` and return the handle to await.
    ///
    /// Fails with [`BusError::DuplicateCorrelation`] if `key` is already
    /// pending, and with [`BusError::Closed`] after [`shutdown`](Self::shutdown).
    pub fn register(&self, key: CorrelationKey) -> Result<PendingHandle<R>, BusError> {
        if self.is_closed() {
            return Err(BusError::Closed);
        }

        let created_at = Instant::now();
        let receiver = match self.pending.entry(key.clone()) {
            Entry::Occupied(_) => return Err(BusError::DuplicateCorrelation(key)),
            Entry::Vacant(vacant) => {
                let (completion, receiver) = oneshot::channel();
                vacant.insert(PendingRequest {
                    completion,
                    created_at,
                });
                receiver
            }
        };

        // A shutdown that drained the table between the check above and the
        // insert would otherwise leave this entry behind.
        if self.is_closed() {
            self.pending.remove(&key);
            return Err(BusError::Closed);
        }

        Ok(PendingHandle {
            key,
            receiver,
            created_at,
        })
    }

    /// Resolve the entry under `key` with `reply` and remove it.
    ///
    /// Returns `false` (and does nothing) if no entry is pending under `key`.
    pub fn complete(&self, key: &CorrelationKey, reply: R) -> bool {
        match self.pending.remove(key) {
            Some((_, pending)) => {
                let waited = pending.created_at.elapsed();
                if pending.completion.send(reply).is_err() {
                    debug!(correlation_id = %key, "Waiter went away before its reply arrived");
                }
                debug!(correlation_id = %key, waited_ms = waited.as_millis() as u64, "Resolved pending request");
                true
            }
            None => {
                debug!(correlation_id = %key, "Received reply but no pending request found");
                false
            }
        }
    }

    /// Remove the entry under `key` without resolving it.
    ///
    /// Returns `false` if the entry was already completed or expired.
    pub fn expire(&self, key: &CorrelationKey) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Whether an entry is pending under `key`.
    pub fn is_pending(&self, key: &CorrelationKey) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of outstanding requests.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Refuse new registrations and fail every outstanding waiter with
    /// [`BusError::Closed`]. Returns how many entries were drained.
    pub fn shutdown(&self) -> usize {
        self.closed.store(true, Ordering::Release);
        let keys: Vec<CorrelationKey> = self.pending.iter().map(|e| e.key().clone()).collect();
        keys.iter()
            .filter(|key| self.pending.remove(*key).is_some())
            .count()
    }
}
