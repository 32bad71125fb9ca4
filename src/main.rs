//! condeval server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - CONDEVAL_HOST: Bind address (default: 0.0.0.0)
//! - CONDEVAL_PORT: Port number (default: 8080)
//! - CONDEVAL_EVAL_TIMEOUT_SECS: Deadline for each evaluation's backend call (default: 30)
//! - CONDEVAL_TRANSFORM_URL: Transform backend base URL (default: http://127.0.0.1:3000)
//! - CONDEVAL_TRANSFORM_TIMEOUT_SECS: HTTP timeout towards the backend (default: 30)
//! - RUST_LOG: Log level (default: info)

use condeval::api::{run_server, ServerConfig};
use condeval::transform::TransformConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "condeval=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let defaults = ServerConfig::default();

    let host = std::env::var("CONDEVAL_HOST").unwrap_or(defaults.host);
    let port: u16 = std::env::var("CONDEVAL_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults.port);
    let eval_timeout_secs = std::env::var("CONDEVAL_EVAL_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.eval_timeout_secs);

    let config = ServerConfig {
        host,
        port,
        eval_timeout_secs,
        transform: TransformConfig::from_env(),
    };

    tracing::info!("condeval configuration:");
    tracing::info!("  Host: {}:{}", config.host, config.port);
    tracing::info!("  Evaluation timeout: {} seconds", config.eval_timeout_secs);
    tracing::info!("  Transform backend: {}", config.transform.base_url);
    tracing::info!(
        "  Transform request timeout: {} seconds",
        config.transform.timeout.as_secs()
    );

    run_server(config).await
}
