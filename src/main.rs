//! AuthGate Server: authentication gateway over an asynchronous user bus.
//!
//! Main entry point that loads configuration, initializes logging and runs
//! the gateway until a shutdown signal arrives.

use tracing_subscriber::{EnvFilter, fmt};

use authgate_core::config::AppConfig;
use authgate_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = authgate_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `config/<AUTHGATE_ENV>.toml` overlay and
/// `AUTHGATE__*` environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("AUTHGATE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing; `RUST_LOG` overrides the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
