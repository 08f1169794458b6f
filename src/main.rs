//! TrustFlow API Server
//!
//! Run with: cargo run --bin trustflow
//!
//! # Configuration
//!
//! Read from `~/.config/trustflow/config.toml`, `/etc/trustflow/config.toml`
//! or `./config.toml`, then overridden by `TRUSTFLOW_*` environment variables.
//! `RUST_LOG` takes precedence over `logging.level` when set.
//! Generate a starting file with `trustflow-cli config`.

use std::sync::Arc;
use trustflow::api::{serve, AppState};
use trustflow::chain::{ChainClient, ChainError, JsonRpcClient};
use trustflow::config::{Config, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    init_tracing(&config.logging);

    tracing::info!("Starting TrustFlow API server v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;
    tracing::info!("RPC provider: {}", config.chain.rpc_url);
    tracing::info!("Campaign factory: {}", config.chain.factory()?);
    tracing::info!(
        "Read cache: {}",
        if config.cache.enabled {
            format!("enabled ({}s TTL)", config.cache.ttl_secs)
        } else {
            "disabled".to_string()
        }
    );

    let chain = Arc::new(JsonRpcClient::new(config.chain.rpc())?);

    // A provider serving another network would make every read wrong
    match chain.chain_id().await {
        Ok(actual) if actual == config.chain.chain_id => {
            tracing::info!("Connected to chain {}", actual);
        }
        Ok(actual) => {
            return Err(ChainError::WrongChain {
                expected: config.chain.chain_id,
                actual,
            }
            .into());
        }
        Err(e) => {
            tracing::warn!("RPC provider not reachable: {} (reads will fail until it is)", e);
        }
    }

    let api_config = config.api.clone();
    let state = AppState::new(config, chain)?;

    serve(state, &api_config).await?;

    tracing::info!("TrustFlow API server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("trustflow={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
