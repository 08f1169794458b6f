//! Campaign Routes
//!
//! Read endpoints behind the list, dashboard and detail pages.
//!
//! - GET /api/v1/campaigns - Every campaign the factory knows
//! - GET /api/v1/owners/:owner/campaigns - Campaigns created by an address
//! - GET /api/v1/campaigns/:address/summary - Card fields for one campaign
//! - GET /api/v1/campaigns/:address/fields/:field - A single field
//! - GET /api/v1/campaigns/:address - Full detail, `?account=` for edit rights

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{parse_address, CampaignListResponse, DetailQuery};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::campaigns::{CampaignDetail, CampaignField, CampaignSummary, FieldReading};
use crate::readmodel::unix_now;

/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CampaignListResponse>> {
    let campaigns = state.campaigns.list_all().await?;

    Ok(Json(CampaignListResponse {
        total: campaigns.len(),
        campaigns,
    }))
}

/// GET /api/v1/owners/:owner/campaigns
pub async fn list_owned_campaigns(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> ApiResult<Json<CampaignListResponse>> {
    let owner = parse_address("owner address", &owner)?;
    let campaigns = state.campaigns.list_owned(owner).await?;

    Ok(Json(CampaignListResponse {
        total: campaigns.len(),
        campaigns,
    }))
}

/// GET /api/v1/campaigns/:address/summary
///
/// Always 200: failed field reads come back as `unavailable` fields.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<Json<CampaignSummary>> {
    let address = parse_address("campaign address", &address)?;
    Ok(Json(state.campaigns.summary(address, unix_now()).await))
}

/// GET /api/v1/campaigns/:address/fields/:field
///
/// 404 for a field name the dashboard doesn't know; a failed read is still 200.
pub async fn get_field(
    State(state): State<Arc<AppState>>,
    Path((address, field)): Path<(String, String)>,
) -> ApiResult<Json<FieldReading>> {
    let address = parse_address("campaign address", &address)?;
    let field: CampaignField = field.parse().map_err(ApiError::NotFound)?;

    Ok(Json(
        state.campaigns.field(address, field, unix_now()).await,
    ))
}

/// GET /api/v1/campaigns/:address
pub async fn get_detail(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<Json<CampaignDetail>> {
    let address = parse_address("campaign address", &address)?;
    let account = query
        .account
        .as_deref()
        .filter(|a| !a.is_empty())
        .map(|a| parse_address("account", a))
        .transpose()?;

    Ok(Json(
        state.campaigns.detail(address, account, unix_now()).await,
    ))
}
