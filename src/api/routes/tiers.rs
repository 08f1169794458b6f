//! Tier and Creation Routes
//!
//! Each route validates its input and answers with an unsigned transaction
//! for the connected wallet to sign; nothing is submitted server-side.
//!
//! - POST /api/v1/campaigns/:address/tiers/prepare-add
//! - POST /api/v1/campaigns/:address/tiers/:index/prepare-remove
//! - POST /api/v1/campaigns/:address/tiers/:index/prepare-fund
//! - POST /api/v1/campaigns/prepare-create

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{parse_address, TierActionRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::campaigns::{CampaignDraft, TierDraft};
use crate::contract::PreparedTransaction;

/// POST /api/v1/campaigns/:address/tiers/prepare-add
pub async fn prepare_add(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Json(draft): Json<TierDraft>,
) -> ApiResult<Json<PreparedTransaction>> {
    let address = parse_address("campaign address", &address)?;
    Ok(Json(state.campaigns.prepare_add_tier(address, &draft)?))
}

/// POST /api/v1/campaigns/:address/tiers/:index/prepare-remove
pub async fn prepare_remove(
    State(state): State<Arc<AppState>>,
    Path((address, index)): Path<(String, usize)>,
    Json(req): Json<TierActionRequest>,
) -> ApiResult<Json<PreparedTransaction>> {
    let address = parse_address("campaign address", &address)?;
    let tx = state
        .campaigns
        .prepare_remove_tier(address, index, req.expected.as_ref())
        .await?;
    Ok(Json(tx))
}

/// POST /api/v1/campaigns/:address/tiers/:index/prepare-fund
pub async fn prepare_fund(
    State(state): State<Arc<AppState>>,
    Path((address, index)): Path<(String, usize)>,
    Json(req): Json<TierActionRequest>,
) -> ApiResult<Json<PreparedTransaction>> {
    let address = parse_address("campaign address", &address)?;
    let tx = state
        .campaigns
        .prepare_fund_tier(address, index, req.expected.as_ref())
        .await?;
    Ok(Json(tx))
}

/// POST /api/v1/campaigns/prepare-create
pub async fn prepare_create(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<CampaignDraft>,
) -> ApiResult<Json<PreparedTransaction>> {
    Ok(Json(state.campaigns.prepare_create_campaign(&draft)?))
}
