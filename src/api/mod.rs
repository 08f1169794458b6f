//! TrustFlow REST API
//!
//! HTTP API layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Campaigns
//! - `GET /api/v1/campaigns` - All campaigns from the factory
//! - `GET /api/v1/owners/:owner/campaigns` - Campaigns created by an address
//! - `GET /api/v1/campaigns/:address/summary` - Card fields
//! - `GET /api/v1/campaigns/:address/fields/:field` - One field on its own
//! - `GET /api/v1/campaigns/:address?account=` - Full detail
//!
//! ## Transactions (prepared for the wallet, never sent from here)
//! - `POST /api/v1/campaigns/prepare-create`
//! - `POST /api/v1/campaigns/:address/tiers/prepare-add`
//! - `POST /api/v1/campaigns/:address/tiers/:index/prepare-remove`
//! - `POST /api/v1/campaigns/:address/tiers/:index/prepare-fund`
//! - `POST /api/v1/transactions/:hash/wait` - Wait for a receipt
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use trustflow::api::{serve, AppState};
//! use trustflow::chain::JsonRpcClient;
//! use trustflow::config::Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let chain = Arc::new(JsonRpcClient::new(config.chain.rpc())?);
//!     let api = config.api.clone();
//!
//!     serve(AppState::new(config, chain)?, &api).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.api.cors_origins);

    let api_routes = Router::new()
        // Campaign reads
        .route("/campaigns", get(routes::campaigns::list_campaigns))
        .route(
            "/owners/:owner/campaigns",
            get(routes::campaigns::list_owned_campaigns),
        )
        .route("/campaigns/:address", get(routes::campaigns::get_detail))
        .route(
            "/campaigns/:address/summary",
            get(routes::campaigns::get_summary),
        )
        .route(
            "/campaigns/:address/fields/:field",
            get(routes::campaigns::get_field),
        )
        // Prepared transactions
        .route("/campaigns/prepare-create", post(routes::tiers::prepare_create))
        .route(
            "/campaigns/:address/tiers/prepare-add",
            post(routes::tiers::prepare_add),
        )
        .route(
            "/campaigns/:address/tiers/:index/prepare-remove",
            post(routes::tiers::prepare_remove),
        )
        .route(
            "/campaigns/:address/tiers/:index/prepare-fund",
            post(routes::tiers::prepare_fund),
        )
        // Confirmation
        .route(
            "/transactions/:hash/wait",
            post(routes::transactions::wait_for_transaction),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Allow the configured dashboard origins; an empty list or `*` allows any
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("TrustFlow API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("TrustFlow API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install signal handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::abi::Token;
    use crate::chain::TransactionReceipt;
    use crate::config::Config;
    use crate::contract::factory::{GET_ALL_CAMPAIGNS, GET_USER_CAMPAIGNS};
    use crate::contract::CampaignEntry;
    use crate::testing::{address, entry_token, tx_hash, MockCampaign, MockChain};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<MockChain>) {
        let mock = Arc::new(MockChain::new());

        let mut config = Config::default();
        config.chain.factory_address = address(0xfa).to_string();
        config.chain.poll_interval_ms = 5;
        config.chain.confirmation_timeout_secs = 1;

        let state = AppState::new(config, mock.clone()).unwrap();
        (build_router(state), mock)
    }

    fn orchard() -> MockCampaign {
        MockCampaign::new("Orchard", address(0xaa))
            .funding(1000, 250)
            .tier("Seed", 10, 4)
            .tier("Sapling", 50, 1)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read(response).await
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read(response).await
    }

    async fn read(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _mock) = create_test_app();
        let (status, _) = get_json(app, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_wrong_chain() {
        let mock = Arc::new(MockChain::with_chain_id(1));
        let mut config = Config::default();
        config.chain.factory_address = address(0xfa).to_string();
        let app = build_router(AppState::new(config, mock).unwrap());

        let (status, body) = get_json(app.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chain"], "wrong_chain");

        let (status, _) = get_json(app, "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_list_campaigns_empty() {
        let (app, mock) = create_test_app();
        mock.set_return(address(0xfa), GET_ALL_CAMPAIGNS, &[], &[Token::Array(vec![])]);

        let (status, body) = get_json(app, "/api/v1/campaigns").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_list_owned_campaigns() {
        let (app, mock) = create_test_app();
        let entry = CampaignEntry {
            campaign_address: address(1),
            campaign_owner: address(0xaa),
            name: "Orchard".to_string(),
            creation_time: 100,
        };
        mock.set_return(
            address(0xfa),
            GET_USER_CAMPAIGNS,
            &[Token::Address(address(0xaa))],
            &[Token::Array(vec![entry_token(&entry)])],
        );

        let uri = format!("/api/v1/owners/{}/campaigns", address(0xaa).to_lower_hex());
        let (status, body) = get_json(app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["campaigns"][0]["name"], "Orchard");
    }

    #[tokio::test]
    async fn test_summary_fields() {
        let (app, mock) = create_test_app();
        mock.set_campaign(address(1), &orchard());

        let uri = format!("/api/v1/campaigns/{}/summary", address(1));
        let (status, body) = get_json(app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"]["status"], "ok");
        assert_eq!(body["goal"]["value"], "1000");
        assert_eq!(body["read_model"]["percentage"], 25.0);
    }

    #[tokio::test]
    async fn test_single_field_read() {
        let (app, mock) = create_test_app();
        mock.set_campaign(address(1), &orchard());

        let uri = format!("/api/v1/campaigns/{}/fields/progress", address(1));
        let (status, body) = get_json(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["field"], "progress");
        assert_eq!(body["value"], 25.0);
        assert_eq!(body["label"], "25%");

        let uri = format!("/api/v1/campaigns/{}/fields/tiers", address(1));
        let (_, body) = get_json(app, &uri).await;
        assert_eq!(body["value"][0]["name"], "Seed");
    }

    #[tokio::test]
    async fn test_single_field_failure_is_not_an_error() {
        let (app, mock) = create_test_app();
        mock.set_campaign(address(1), &orchard());
        mock.set_unavailable(address(1), crate::contract::campaign::OWNER, &[]);

        let uri = format!("/api/v1/campaigns/{}/fields/owner", address(1));
        let (status, body) = get_json(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unavailable");

        let uri = format!("/api/v1/campaigns/{}/fields/name", address(1));
        let (_, body) = get_json(app, &uri).await;
        assert_eq!(body["value"], "Orchard");
    }

    #[tokio::test]
    async fn test_unknown_field_is_not_found() {
        let (app, _mock) = create_test_app();

        let uri = format!("/api/v1/campaigns/{}/fields/treasury", address(1));
        let (status, body) = get_json(app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_detail_owner_flag() {
        let (app, mock) = create_test_app();
        mock.set_campaign(address(1), &orchard());

        let uri = format!(
            "/api/v1/campaigns/{}?account={}",
            address(1),
            address(0xaa).to_lower_hex()
        );
        let (status, body) = get_json(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_owner"], true);
        assert_eq!(body["tiers"]["value"][1]["name"], "Sapling");

        let uri = format!("/api/v1/campaigns/{}", address(1));
        let (_, body) = get_json(app, &uri).await;
        assert_eq!(body["is_owner"], false);
    }

    #[tokio::test]
    async fn test_invalid_address_is_validation_error() {
        let (app, _mock) = create_test_app();
        let (status, body) = get_json(app, "/api/v1/campaigns/0x1234/summary").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_prepare_add_rejects_zero_amount() {
        let (app, _mock) = create_test_app();
        let uri = format!("/api/v1/campaigns/{}/tiers/prepare-add", address(1));
        let (status, body) = post_json(app, &uri, serde_json::json!({"name": "Gold", "amount": "0"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_prepare_remove_conflict() {
        let (app, mock) = create_test_app();
        mock.set_campaign(address(1), &orchard());

        let uri = format!("/api/v1/campaigns/{}/tiers/1/prepare-remove", address(1));
        let body = serde_json::json!({"expected": {"name": "Tree", "amount": "200"}});
        let (status, body) = post_json(app, &uri, body).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "TIER_CONFLICT");
    }

    #[tokio::test]
    async fn test_prepare_fund_value_from_chain() {
        let (app, mock) = create_test_app();
        mock.set_campaign(address(1), &orchard());

        let uri = format!("/api/v1/campaigns/{}/tiers/1/prepare-fund", address(1));
        let (status, body) = post_json(app, &uri, serde_json::json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], "0x32");
        assert_eq!(body["method"], "fund(uint256)");
    }

    #[tokio::test]
    async fn test_prepare_create() {
        let (app, _mock) = create_test_app();
        let draft = serde_json::json!({
            "name": "Library",
            "description": "Books",
            "goal": "5000",
            "duration_days": 30
        });
        let (status, body) = post_json(app, "/api/v1/campaigns/prepare-create", draft).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["to"], address(0xfa).to_string());
    }

    #[tokio::test]
    async fn test_wait_reports_created_campaign() {
        let (app, mock) = create_test_app();
        let hash = tx_hash(9);
        mock.queue_receipts(
            hash,
            vec![Some(TransactionReceipt {
                transaction_hash: hash,
                block_number: 7,
                success: true,
            })],
        );
        let entry = CampaignEntry {
            campaign_address: address(5),
            campaign_owner: address(0xaa),
            name: "Library".to_string(),
            creation_time: 500,
        };
        mock.set_return(
            address(0xfa),
            GET_USER_CAMPAIGNS,
            &[Token::Address(address(0xaa))],
            &[Token::Array(vec![entry_token(&entry)])],
        );

        let uri = format!("/api/v1/transactions/{}/wait", hash);
        let body = serde_json::json!({"kind": "create_campaign", "owner": address(0xaa).to_string()});
        let (status, body) = post_json(app, &uri, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "confirmed");
        assert_eq!(body["block_number"], 7);
        assert_eq!(body["created_campaign"]["campaign_address"], address(5).to_string());
    }

    #[tokio::test]
    async fn test_wait_refreshes_summary_after_confirmation() {
        let (app, mock) = create_test_app();
        mock.set_campaign(address(1), &orchard());
        let uri = format!("/api/v1/campaigns/{}/summary", address(1));
        let (_, body) = get_json(app.clone(), &uri).await;
        assert_eq!(body["balance"]["value"], "250");

        // A contribution lands on chain
        mock.set_campaign(address(1), &orchard().funding(1000, 300));
        let hash = tx_hash(3);
        mock.queue_receipts(
            hash,
            vec![Some(TransactionReceipt {
                transaction_hash: hash,
                block_number: 8,
                success: true,
            })],
        );
        let wait_uri = format!("/api/v1/transactions/{}/wait", hash);
        let affected = serde_json::json!({"affected": [address(1).to_string()], "kind": "fund"});
        let (status, _) = post_json(app.clone(), &wait_uri, affected).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = get_json(app, &uri).await;
        assert_eq!(body["balance"]["value"], "300");
    }

    #[tokio::test]
    async fn test_wait_create_requires_owner() {
        let (app, _mock) = create_test_app();
        let uri = format!("/api/v1/transactions/{}/wait", tx_hash(1));
        let (status, _) = post_json(app, &uri, serde_json::json!({"kind": "create_campaign"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
