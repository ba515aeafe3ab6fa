//! Bus-level errors.

use std::time::Duration;

use thiserror::Error;

use authgate_core::error::{AppError, ErrorKind};

use crate::registry::CorrelationKey;

/// Errors raised by the correlation bridge and its transports.
#[derive(Debug, Error)]
pub enum BusError {
    /// No matching reply arrived before the deadline.
    #[error("no reply for correlation id {key} within {timeout:?}")]
    Timeout {
        /// The request's correlation id.
        key: CorrelationKey,
        /// The deadline that elapsed.
        timeout: Duration,
    },
    /// The request could not be handed to the bus.
    #[error("failed to publish to '{topic}': {reason}")]
    DispatchFailed {
        /// Destination topic.
        topic: String,
        /// Transport-specific cause.
        reason: String,
    },
    /// A pending entry already exists under this correlation id.
    #[error("correlation id {0} is already pending")]
    DuplicateCorrelation(CorrelationKey),
    /// The registry was shut down; no new requests are accepted and
    /// outstanding ones were failed.
    #[error("correlation registry is shut down")]
    Closed,
    /// A message could not be encoded or decoded.
    #[error("message codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl BusError {
    /// Build a dispatch failure from any displayable cause.
    pub fn dispatch(topic: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::DispatchFailed {
            topic: topic.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<BusError> for AppError {
    fn from(err: BusError) -> Self {
        let message = match &err {
            BusError::Timeout { .. } => "User service did not respond in time",
            BusError::DispatchFailed { .. } => "User service is unreachable",
            BusError::Closed => "Service is shutting down",
            BusError::DuplicateCorrelation(_) | BusError::Codec(_) => {
                "User service request failed"
            }
        };
        AppError::with_source(ErrorKind::Internal, message, err)
    }
}
