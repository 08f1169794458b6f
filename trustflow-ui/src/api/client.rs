//! HTTP API Client
//!
//! Functions for communicating with the TrustFlow REST API. Amounts travel
//! as decimal strings in both directions.

use std::fmt;

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8082/api/v1";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item("trustflow_api_url").ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Health routes live beside the versioned API, not under it
fn health_url() -> String {
    let base = get_api_base();
    let root = base.strip_suffix("/api/v1").unwrap_or(&base);
    format!("{}/health", root)
}

// ============ Response Types ============

/// One field of a campaign read; failures are explicit, never blank
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Field<T> {
    Ok { value: T },
    Unavailable { error: String },
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Ok { value } => Some(value),
            Field::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CampaignEntry {
    pub campaign_address: String,
    pub campaign_owner: String,
    pub name: String,
    pub creation_time: u64,
}

#[derive(Debug, Deserialize)]
pub struct CampaignListResponse {
    pub total: usize,
    pub campaigns: Vec<CampaignEntry>,
}

/// A single campaign field, read by its own request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldReading<T> {
    pub field: String,
    #[serde(flatten)]
    pub reading: Field<T>,
    /// Server-side display text, e.g. "3 days left" or "25%"
    #[serde(default)]
    pub label: Option<String>,
}

impl<T> FieldReading<T> {
    pub fn value(&self) -> Option<&T> {
        self.reading.value()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tier {
    pub name: String,
    pub amount: String,
    pub backers: u64,
}

/// Unsigned transaction, handed to the wallet as is
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreparedTransaction {
    pub to: String,
    pub data: String,
    pub value: String,
    pub method: String,
}

/// What the caller saw at a tier index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierExpectation {
    pub name: String,
    pub amount: String,
}

impl From<&Tier> for TierExpectation {
    fn from(tier: &Tier) -> Self {
        Self {
            name: tier.name.clone(),
            amount: tier.amount.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaitResponse {
    /// "confirmed", "reverted" or "pending"
    pub outcome: String,
    pub hash: String,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub created_campaign: Option<CampaignEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub chain: String,
    pub chain_id: Option<u64>,
    pub expected_chain_id: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// A failed API call
#[derive(Debug, Clone, PartialEq)]
pub struct ClientError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl ClientError {
    fn network(message: String) -> Self {
        Self {
            status: None,
            code: None,
            message,
        }
    }

    /// The tier at the index changed since it was displayed
    pub fn is_conflict(&self) -> bool {
        self.status == Some(409)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.ok() {
        let status = response.status();
        return Err(match response.json::<ErrorResponse>().await {
            Ok(body) => ClientError {
                status: Some(status),
                code: Some(body.error.code),
                message: body.error.message,
            },
            Err(_) => ClientError {
                status: Some(status),
                code: None,
                message: format!("Request failed with status {}", status),
            },
        });
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::network(format!("Parse error: {}", e)))
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ClientError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| ClientError::network(format!("Network error: {}", e)))?;
    read_json(response).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, ClientError> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| ClientError::network(format!("Request build error: {}", e)))?
        .send()
        .await
        .map_err(|e| ClientError::network(format!("Network error: {}", e)))?;
    read_json(response).await
}

// ============ Reads ============

/// Every campaign the factory knows
pub async fn fetch_campaigns() -> Result<Vec<CampaignEntry>, ClientError> {
    let list: CampaignListResponse =
        get_json(&format!("{}/campaigns", get_api_base())).await?;
    Ok(list.campaigns)
}

/// Campaigns created by one owner
pub async fn fetch_owned_campaigns(owner: &str) -> Result<Vec<CampaignEntry>, ClientError> {
    let list: CampaignListResponse =
        get_json(&format!("{}/owners/{}/campaigns", get_api_base(), owner)).await?;
    Ok(list.campaigns)
}

/// One field of one campaign. Fields load independently, so a slow or
/// failing read only affects its own slot on the page.
pub async fn fetch_field<T: DeserializeOwned>(
    address: &str,
    field: &str,
) -> Result<FieldReading<T>, ClientError> {
    get_json(&format!("{}/campaigns/{}/fields/{}", get_api_base(), address, field)).await
}

pub async fn fetch_health() -> Result<HealthResponse, ClientError> {
    get_json(&health_url()).await
}

// ============ Prepared transactions ============

pub async fn prepare_add_tier(address: &str, name: &str, amount: u128) -> Result<PreparedTransaction, ClientError> {
    #[derive(Serialize)]
    struct AddTierRequest<'a> {
        name: &'a str,
        amount: String,
    }

    post_json(
        &format!("{}/campaigns/{}/tiers/prepare-add", get_api_base(), address),
        &AddTierRequest {
            name,
            amount: amount.to_string(),
        },
    )
    .await
}

#[derive(Serialize)]
struct TierActionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<&'a TierExpectation>,
}

pub async fn prepare_remove_tier(
    address: &str,
    index: usize,
    expected: Option<&TierExpectation>,
) -> Result<PreparedTransaction, ClientError> {
    post_json(
        &format!("{}/campaigns/{}/tiers/{}/prepare-remove", get_api_base(), address, index),
        &TierActionRequest { expected },
    )
    .await
}

/// The value to send comes back in the prepared transaction, read fresh
pub async fn prepare_fund_tier(
    address: &str,
    index: usize,
    expected: Option<&TierExpectation>,
) -> Result<PreparedTransaction, ClientError> {
    post_json(
        &format!("{}/campaigns/{}/tiers/{}/prepare-fund", get_api_base(), address, index),
        &TierActionRequest { expected },
    )
    .await
}

pub async fn prepare_create_campaign(
    name: &str,
    description: &str,
    goal: u128,
    duration_days: u64,
) -> Result<PreparedTransaction, ClientError> {
    #[derive(Serialize)]
    struct CreateCampaignRequest<'a> {
        name: &'a str,
        description: &'a str,
        goal: String,
        duration_days: u64,
    }

    post_json(
        &format!("{}/campaigns/prepare-create", get_api_base()),
        &CreateCampaignRequest {
            name,
            description,
            goal: goal.to_string(),
            duration_days,
        },
    )
    .await
}

// ============ Confirmation ============

/// Transaction kinds understood by the wait route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    AddTier,
    RemoveTier,
    Fund,
    CreateCampaign,
}

/// Block until the server sees a receipt or gives up
pub async fn wait_for_transaction(
    hash: &str,
    affected: Vec<String>,
    kind: TxKind,
    owner: Option<String>,
) -> Result<WaitResponse, ClientError> {
    #[derive(Serialize)]
    struct WaitRequest {
        affected: Vec<String>,
        kind: TxKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
    }

    post_json(
        &format!("{}/transactions/{}/wait", get_api_base(), hash),
        &WaitRequest {
            affected,
            kind,
            owner,
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_reading_with_label() {
        let json = r#"{
            "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "field": "deadline",
            "status": "ok",
            "value": 1700000000,
            "label": "3 days left"
        }"#;

        let reading: FieldReading<u64> = serde_json::from_str(json).unwrap();
        assert_eq!(reading.value(), Some(&1700000000));
        assert_eq!(reading.label.as_deref(), Some("3 days left"));
    }

    #[test]
    fn test_unavailable_field_reading() {
        let json = r#"{
            "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "field": "tiers",
            "status": "unavailable",
            "error": "RPC provider unavailable"
        }"#;

        let reading: FieldReading<Vec<Tier>> = serde_json::from_str(json).unwrap();
        assert!(reading.value().is_none());
        assert!(reading.label.is_none());
        assert_eq!(
            reading.reading,
            Field::Unavailable {
                error: "RPC provider unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_wait_response_outcomes() {
        let pending: WaitResponse = serde_json::from_str(
            r#"{"outcome": "pending", "hash": "0xab"}"#,
        )
        .unwrap();
        assert_eq!(pending.outcome, "pending");
        assert!(pending.block_number.is_none());
        assert!(pending.created_campaign.is_none());
    }

    #[test]
    fn test_tier_action_omits_missing_expectation() {
        let body = serde_json::to_string(&TierActionRequest { expected: None }).unwrap();
        assert_eq!(body, "{}");
    }
}
