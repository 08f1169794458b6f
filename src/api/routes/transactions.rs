//! Transaction Routes
//!
//! - POST /api/v1/transactions/:hash/wait - Wait for a submitted transaction

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{parse_tx_hash, TxKind, WaitRequest, WaitResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// POST /api/v1/transactions/:hash/wait
///
/// Blocks until the receipt arrives or the confirmation timeout passes.
/// A timeout answers `pending` rather than an error.
pub async fn wait_for_transaction(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
    Json(req): Json<WaitRequest>,
) -> ApiResult<Json<WaitResponse>> {
    let hash = parse_tx_hash(&hash)?;
    let creating = req.kind == Some(TxKind::CreateCampaign);

    let mut affected = req.affected;
    if creating {
        if req.owner.is_none() {
            return Err(ApiError::Validation(
                "owner is required for create_campaign".to_string(),
            ));
        }
        affected.push(state.campaigns.factory().address());
    }

    let outcome = state.tracker.wait(hash, &affected).await?;

    let created_campaign = match req.owner {
        Some(owner) if creating && outcome.is_confirmed() => {
            let entry = state.campaigns.resolve_created_campaign(owner).await?;
            if let Some(entry) = &entry {
                tracing::info!(hash = %hash, campaign = %entry.campaign_address, "Campaign created");
            }
            entry
        }
        _ => None,
    };

    Ok(Json(WaitResponse {
        outcome,
        created_campaign,
    }))
}
