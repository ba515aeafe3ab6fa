//! Correlation envelopes wrapped around bus payloads.
//!
//! The correlation id is generated per request; business keys such as the
//! username travel only inside the payload.

use serde::{Deserialize, Serialize};

use super::user::UserEvent;

/// An outbound request with its routing metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope<P> {
    /// Identifier the reply must echo.
    pub correlation_id: String,
    /// Topic the reply is expected on.
    pub reply_to: String,
    /// The request body.
    #[serde(flatten)]
    pub payload: P,
}

/// An inbound reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEnvelope {
    /// Identifier copied from the request. Replies without one cannot be routed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// The reply body.
    #[serde(flatten)]
    pub event: UserEvent,
}
