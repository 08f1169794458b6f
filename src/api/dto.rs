//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::campaigns::{TierExpectation, TxOutcome};
use crate::chain::{Address, TxHash};
use crate::contract::CampaignEntry;

/// Parse a path or query address, reporting which input was bad
pub fn parse_address(what: &str, value: &str) -> ApiResult<Address> {
    value
        .parse()
        .map_err(|e| ApiError::Validation(format!("Invalid {} {:?}: {}", what, value, e)))
}

pub fn parse_tx_hash(value: &str) -> ApiResult<TxHash> {
    value
        .parse()
        .map_err(|e| ApiError::Validation(format!("Invalid transaction hash {:?}: {}", value, e)))
}

// ============================================
// CAMPAIGN DTOs
// ============================================

/// Factory listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignListResponse {
    pub total: usize,
    pub campaigns: Vec<CampaignEntry>,
}

/// `?account=` on the detail route
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// Connected wallet, decides `is_owner`
    #[serde(default)]
    pub account: Option<String>,
}

// ============================================
// TIER DTOs
// ============================================

/// Body of the by-index tier routes
#[derive(Debug, Default, Deserialize)]
pub struct TierActionRequest {
    /// The tier the caller saw at the index; checked against a fresh read
    #[serde(default)]
    pub expected: Option<TierExpectation>,
}

// ============================================
// TRANSACTION DTOs
// ============================================

/// What a submitted transaction was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    AddTier,
    RemoveTier,
    Fund,
    CreateCampaign,
}

/// Wait request
#[derive(Debug, Deserialize)]
pub struct WaitRequest {
    /// Contracts whose cached reads go stale once the transaction is mined
    #[serde(default)]
    pub affected: Vec<Address>,
    #[serde(default)]
    pub kind: Option<TxKind>,
    /// Creator of a `create_campaign` transaction
    #[serde(default)]
    pub owner: Option<Address>,
}

/// Wait response
#[derive(Debug, Serialize)]
pub struct WaitResponse {
    #[serde(flatten)]
    pub outcome: TxOutcome,
    /// Newest campaign of the creator, for confirmed creations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_campaign: Option<CampaignEntry>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy", "degraded" or "unhealthy"
    pub status: String,
    /// "ok", "wrong_chain" or "error"
    pub chain: String,
    pub chain_id: Option<u64>,
    pub expected_chain_id: u64,
    pub cache_entries: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
