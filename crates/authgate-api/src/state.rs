//! Application state shared across all handlers.

use std::sync::Arc;

use tokio::time::Instant;

use authgate_auth::AuthOrchestrator;
use authgate_bus::RequestReplyClient;
use authgate_core::traits::CacheProvider;

/// Dependencies handed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Authentication flows.
    pub auth: Arc<AuthOrchestrator>,
    /// Request/reply bridge, read for its counters.
    pub bus: RequestReplyClient,
    /// Session backend, probed by the health check.
    pub cache: Arc<dyn CacheProvider>,
    /// When the server started.
    pub started_at: Instant,
}

impl AppState {
    /// Bundle the shared dependencies.
    pub fn new(
        auth: Arc<AuthOrchestrator>,
        bus: RequestReplyClient,
        cache: Arc<dyn CacheProvider>,
    ) -> Self {
        Self {
            auth,
            bus,
            cache,
            started_at: Instant::now(),
        }
    }
}
