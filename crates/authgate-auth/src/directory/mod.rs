//! Access to the user persistence service.

pub mod bus;

pub use bus::BusUserDirectory;

use async_trait::async_trait;

use authgate_core::events::{UserCreateRequest, UserEvent};
use authgate_core::result::AppResult;

/// Looks up and creates users owned by an external service.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by name. `NOT_FOUND` is a reply, not an error.
    async fn find_user(&self, username: &str) -> AppResult<UserEvent>;

    /// Create a user. A conflict is reported as an `ERROR` reply.
    async fn create_user(&self, request: &UserCreateRequest) -> AppResult<UserEvent>;
}
