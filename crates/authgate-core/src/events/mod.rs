//! Messages exchanged with the user persistence service over the bus.
//!
//! Requests are published on the request topics wrapped in a
//! [`RequestEnvelope`]; the persistence service answers on the reply topic
//! with a [`ReplyEnvelope`] echoing the correlation id.

pub mod envelope;
pub mod user;

pub use envelope::{ReplyEnvelope, RequestEnvelope};
pub use user::{UserCreateRequest, UserEvent, UserEventKind, UserFindRequest};
