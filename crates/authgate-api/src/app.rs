//! Application builder: wires the bus, the session store and the auth
//! flows into a running gateway.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use authgate_auth::{
    Argon2Verifier, AuthOrchestrator, BusUserDirectory, CacheSessionStore, JwtDecoder, JwtEncoder,
};
use authgate_bus::transport::{InMemoryBus, RedisBus};
use authgate_bus::{
    BridgeMetrics, CorrelationRegistry, MessagePublisher, MessageSubscriber, Reply, ReplyListener,
    RequestChannel, RequestReplyClient,
};
use authgate_cache::CacheManager;
use authgate_cache::memory::{ExpirySweeper, MemoryCacheProvider};
use authgate_cache::redis::mask_redis_url;
use authgate_core::config::{AppConfig, BusConfig};
use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_core::traits::CacheProvider;

use crate::router::build_router;
use crate::state::AppState;

/// Publishing and subscribing halves of the message bus.
#[derive(Debug, Clone)]
pub struct Transport {
    /// Sends requests.
    pub publisher: Arc<dyn MessagePublisher>,
    /// Receives replies.
    pub subscriber: Arc<dyn MessageSubscriber>,
}

impl Transport {
    /// Both halves backed by one in-process bus.
    pub fn in_memory(bus: InMemoryBus) -> Self {
        let bus = Arc::new(bus);
        Self {
            publisher: bus.clone(),
            subscriber: bus,
        }
    }

    /// Build the transport named by `bus.provider`.
    pub async fn from_config(config: &BusConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "memory" => {
                info!("Using in-memory message bus");
                Ok(Self::in_memory(InMemoryBus::new(config.channel_capacity)))
            }
            "redis" => {
                info!(url = %mask_redis_url(&config.redis_url), "Using Redis pub/sub message bus");
                let bus = Arc::new(
                    RedisBus::connect(&config.redis_url, config.channel_capacity).await?,
                );
                Ok(Self {
                    publisher: bus.clone(),
                    subscriber: bus,
                })
            }
            other => Err(AppError::configuration(format!(
                "Unknown bus provider: '{other}'. Supported: memory, redis"
            ))),
        }
    }
}

/// The wired gateway: shared state plus its background tasks.
#[derive(Debug)]
pub struct Gateway {
    state: AppState,
    registry: Arc<CorrelationRegistry<Reply>>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Gateway {
    /// Wire every component and start the reply listener (and, for the
    /// memory session backend, the expiry sweeper).
    ///
    /// The reply subscription is open before this returns, so no reply to
    /// a request sent afterwards can be missed.
    pub async fn start(config: &AppConfig, transport: Transport) -> AppResult<Self> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = Vec::new();

        // ── Session store ────────────────────────────────────────
        info!(provider = %config.cache.provider, "Initializing session store");
        let cache: Arc<dyn CacheProvider> = if config.cache.provider == "memory" {
            let memory = MemoryCacheProvider::new();
            let sweeper = ExpirySweeper::new(
                memory.clone(),
                Duration::from_secs(config.session.sweep_interval_seconds.max(1)),
            );
            tasks.push(tokio::spawn(sweeper.run(shutdown_rx.clone())));
            Arc::new(CacheManager::from_provider(Arc::new(memory)))
        } else {
            Arc::new(CacheManager::new(&config.cache).await?)
        };

        // ── Correlation bridge ───────────────────────────────────
        let registry = Arc::new(CorrelationRegistry::<Reply>::new());
        let metrics = Arc::new(BridgeMetrics::new());

        let replies = transport
            .subscriber
            .subscribe(&config.bus.topics.replies)
            .await?;
        let listener = ReplyListener::new(Arc::clone(&registry), Arc::clone(&metrics));
        tasks.push(tokio::spawn(listener.run(replies, shutdown_rx)));

        let client = RequestReplyClient::new(
            Arc::clone(&registry),
            RequestChannel::new(transport.publisher, config.bus.topics.replies.clone()),
            metrics,
            config.bus.request_timeout(),
        );

        // ── Auth flows ───────────────────────────────────────────
        let auth = AuthOrchestrator::new(
            Arc::new(BusUserDirectory::new(client.clone(), config.bus.topics.clone())),
            Arc::new(Argon2Verifier::new()),
            Arc::new(CacheSessionStore::new(
                Arc::clone(&cache),
                config.session.clone(),
            )),
            Arc::new(JwtEncoder::new(&config.auth)),
            Arc::new(JwtDecoder::new(&config.auth)),
            config.auth.default_roles.clone(),
            config.auth.access_token_ttl(),
        );

        Ok(Self {
            state: AppState::new(Arc::new(auth), client, cache),
            registry,
            shutdown_tx,
            tasks,
        })
    }

    /// Shared handler state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The pending-request table.
    pub fn registry(&self) -> &Arc<CorrelationRegistry<Reply>> {
        &self.registry
    }

    /// A router serving the RPC surface.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Stop background tasks and fail every request still awaiting a reply.
    pub async fn shutdown(self, grace: Duration) {
        let _ = self.shutdown_tx.send(true);

        let drained = self.registry.shutdown();
        if drained > 0 {
            warn!(drained, "Failed pending requests at shutdown");
        }

        for task in self.tasks {
            if tokio::time::timeout(grace, task).await.is_err() {
                warn!("Background task did not stop within the grace period");
            }
        }
        info!("Gateway stopped");
    }
}

/// Run the gateway until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting AuthGate v{}", env!("CARGO_PKG_VERSION"));

    let transport = Transport::from_config(&config.bus).await?;
    let gateway = Gateway::start(&config, transport).await?;

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;
    info!(addr = %addr, "AuthGate listening");

    axum::serve(listener, gateway.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    info!("HTTP server stopped, shutting down background tasks");
    gateway
        .shutdown(Duration::from_secs(config.server.shutdown_grace_seconds))
        .await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
