//! [`UserDirectory`] over the request/reply bridge.

use async_trait::async_trait;
use tracing::debug;

use authgate_bus::RequestReplyClient;
use authgate_core::config::TopicConfig;
use authgate_core::events::{UserCreateRequest, UserEvent, UserFindRequest};
use authgate_core::result::AppResult;

use super::UserDirectory;

/// Sends user queries to the persistence service and awaits its replies.
#[derive(Debug, Clone)]
pub struct BusUserDirectory {
    client: RequestReplyClient,
    topics: TopicConfig,
}

impl BusUserDirectory {
    /// Creates a directory publishing on `topics` through `client`.
    pub fn new(client: RequestReplyClient, topics: TopicConfig) -> Self {
        Self { client, topics }
    }
}

#[async_trait]
impl UserDirectory for BusUserDirectory {
    async fn find_user(&self, username: &str) -> AppResult<UserEvent> {
        let request = UserFindRequest {
            username: username.to_string(),
        };
        let reply = self.client.send(&self.topics.find, &request).await?;
        debug!(username = %username, kind = ?reply.kind, "User lookup answered");
        Ok(reply)
    }

    async fn create_user(&self, request: &UserCreateRequest) -> AppResult<UserEvent> {
        let reply = self.client.send(&self.topics.create, request).await?;
        debug!(username = %request.username, kind = ?reply.kind, "User creation answered");
        Ok(reply)
    }
}
