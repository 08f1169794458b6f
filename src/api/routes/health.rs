//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (provider reachable, right chain)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::chain::ChainClient;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the provider answers with the configured chain id.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_chain(&state).await {
        ChainHealth::Ok(_) => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let chain = check_chain(&state).await;

    let (status, chain_status, chain_id) = match chain {
        ChainHealth::Ok(id) => ("healthy", "ok", Some(id)),
        ChainHealth::WrongChain(id) => ("degraded", "wrong_chain", Some(id)),
        ChainHealth::Error => ("unhealthy", "error", None),
    };

    Json(HealthResponse {
        status: status.to_string(),
        chain: chain_status.to_string(),
        chain_id,
        expected_chain_id: state.config.chain.chain_id,
        cache_entries: state.client.cache().len().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

enum ChainHealth {
    Ok(u64),
    WrongChain(u64),
    Error,
}

async fn check_chain(state: &AppState) -> ChainHealth {
    match state.client.chain_id().await {
        Ok(id) if id == state.config.chain.chain_id => ChainHealth::Ok(id),
        Ok(id) => ChainHealth::WrongChain(id),
        Err(e) => {
            tracing::warn!(error = %e, "Chain health check failed");
            ChainHealth::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
