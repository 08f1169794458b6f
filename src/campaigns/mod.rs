//! Campaign Services
//!
//! The dashboard's use cases on top of the contract bindings:
//!
//! - listing campaigns from the factory and summarizing each one
//! - assembling a campaign's full detail for a connected account
//! - preparing tier and creation transactions ([`tiers`], [`creation`])
//! - waiting for submitted transactions ([`transactions`])
//!
//! Every field of a summary or detail is queried independently. A failed
//! query marks only that field [`Field::Unavailable`]; the rest still render.
//! [`CampaignService::field`] reads a single field so a slow query never
//! holds back the others.

pub mod creation;
pub mod tiers;
pub mod transactions;

pub use creation::{CampaignDraft, CreationError};
pub use tiers::{TierDraft, TierError, TierExpectation};
pub use transactions::{TxOutcome, TxTracker};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::chain::{Address, Amount, CachingClient, ChainResult};
use crate::contract::{CampaignContract, CampaignEntry, CampaignStatus, FactoryContract, Tier};
use crate::readmodel::{self, ReadModel};

/// Outcome of one field query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Field<T> {
    Ok { value: T },
    Unavailable { error: String },
}

impl<T> Field<T> {
    pub fn from_result(field: &str, address: &Address, result: ChainResult<T>) -> Self {
        match result {
            Ok(value) => Field::Ok { value },
            Err(e) => {
                tracing::warn!(address = %address, field, error = %e, "Campaign field unavailable");
                Field::Unavailable {
                    error: e.to_string(),
                }
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Ok { value } => Some(value),
            Field::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Field::Ok { .. })
    }
}

/// What a campaign card shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub address: Address,
    pub name: Field<String>,
    pub description: Field<String>,
    pub goal: Field<Amount>,
    pub balance: Field<Amount>,
    pub deadline: Field<u64>,
    pub read_model: ReadModel,
}

/// Everything the detail page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub summary: CampaignSummary,
    pub owner: Field<Address>,
    pub state: Field<CampaignStatus>,
    pub status_label: Option<String>,
    pub tiers: Field<Vec<Tier>>,
    pub deadline_date: Option<String>,
    /// Advisory only: decides whether edit controls are offered
    pub is_owner: bool,
}

/// A campaign field that can be read on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignField {
    Name,
    Description,
    Goal,
    Balance,
    Deadline,
    Progress,
    Owner,
    State,
    Tiers,
}

impl CampaignField {
    pub const ALL: [CampaignField; 9] = [
        CampaignField::Name,
        CampaignField::Description,
        CampaignField::Goal,
        CampaignField::Balance,
        CampaignField::Deadline,
        CampaignField::Progress,
        CampaignField::Owner,
        CampaignField::State,
        CampaignField::Tiers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignField::Name => "name",
            CampaignField::Description => "description",
            CampaignField::Goal => "goal",
            CampaignField::Balance => "balance",
            CampaignField::Deadline => "deadline",
            CampaignField::Progress => "progress",
            CampaignField::Owner => "owner",
            CampaignField::State => "state",
            CampaignField::Tiers => "tiers",
        }
    }
}

impl fmt::Display for CampaignField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampaignField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown campaign field '{}'", s))
    }
}

/// Raw value of a single field read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Amount(Amount),
    Timestamp(u64),
    Percentage(f64),
    Address(Address),
    Status(CampaignStatus),
    Tiers(Vec<Tier>),
}

/// One field of one campaign, with its display label when it has one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReading {
    pub address: Address,
    pub field: CampaignField,
    #[serde(flatten)]
    pub reading: Field<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Entry point for campaign reads
pub struct CampaignService {
    client: Arc<CachingClient>,
    factory: FactoryContract,
}

impl CampaignService {
    pub fn new(client: Arc<CachingClient>, factory_address: Address) -> Self {
        let factory = FactoryContract::new(factory_address, Arc::clone(&client));
        Self { client, factory }
    }

    pub fn factory(&self) -> &FactoryContract {
        &self.factory
    }

    pub fn campaign(&self, address: Address) -> CampaignContract {
        CampaignContract::new(address, Arc::clone(&self.client))
    }

    pub async fn list_all(&self) -> ChainResult<Vec<CampaignEntry>> {
        self.factory.all_campaigns().await
    }

    pub async fn list_owned(&self, owner: Address) -> ChainResult<Vec<CampaignEntry>> {
        self.factory.user_campaigns(owner).await
    }

    /// Reads a single field. Progress is the only field that needs two
    /// queries (goal and balance); every other field is one call.
    pub async fn field(&self, address: Address, field: CampaignField, now: u64) -> FieldReading {
        let contract = self.campaign(address);

        let result: ChainResult<(FieldValue, Option<String>)> = match field {
            CampaignField::Name => contract.name().await.map(|v| (FieldValue::Text(v), None)),
            CampaignField::Description => contract
                .description()
                .await
                .map(|v| (FieldValue::Text(v), None)),
            CampaignField::Goal => contract.goal().await.map(|v| (FieldValue::Amount(v), None)),
            CampaignField::Balance => contract
                .balance()
                .await
                .map(|v| (FieldValue::Amount(v), None)),
            CampaignField::Deadline => contract.deadline().await.map(|deadline| {
                let label = readmodel::days_left_label(readmodel::days_left(deadline, now));
                (FieldValue::Timestamp(deadline), Some(label))
            }),
            CampaignField::Progress => {
                let (goal, balance) = tokio::join!(contract.goal(), contract.balance());
                goal.and_then(|goal| {
                    balance.map(|balance| {
                        let percentage = readmodel::funding_percentage(goal.get(), balance.get());
                        let label = format!("{:.0}%", percentage.round());
                        (FieldValue::Percentage(percentage), Some(label))
                    })
                })
            }
            CampaignField::Owner => contract
                .owner()
                .await
                .map(|v| (FieldValue::Address(v), None)),
            CampaignField::State => contract
                .state()
                .await
                .map(|s| (FieldValue::Status(s), Some(s.label().to_string()))),
            CampaignField::Tiers => contract
                .tiers()
                .await
                .map(|v| (FieldValue::Tiers(v), None)),
        };

        let (reading, label) = match Field::from_result(field.as_str(), &address, result) {
            Field::Ok {
                value: (value, label),
            } => (Field::Ok { value }, label),
            Field::Unavailable { error } => (Field::Unavailable { error }, None),
        };

        FieldReading {
            address,
            field,
            reading,
            label,
        }
    }

    /// Card fields for one campaign, each queried concurrently
    pub async fn summary(&self, address: Address, now: u64) -> CampaignSummary {
        let contract = self.campaign(address);

        let (name, description, goal, balance, deadline) = tokio::join!(
            contract.name(),
            contract.description(),
            contract.goal(),
            contract.balance(),
            contract.deadline(),
        );

        let goal = Field::from_result("goal", &address, goal);
        let balance = Field::from_result("balance", &address, balance);
        let deadline = Field::from_result("deadline", &address, deadline);
        let read_model = ReadModel::build(
            goal.value().map(Amount::get),
            balance.value().map(Amount::get),
            deadline.value().copied(),
            now,
        );

        CampaignSummary {
            address,
            name: Field::from_result("name", &address, name),
            description: Field::from_result("description", &address, description),
            goal,
            balance,
            deadline,
            read_model,
        }
    }

    /// Full detail for one campaign as seen by `account`
    pub async fn detail(&self, address: Address, account: Option<Address>, now: u64) -> CampaignDetail {
        let contract = self.campaign(address);

        let (summary, owner, state, tiers) = tokio::join!(
            self.summary(address, now),
            contract.owner(),
            contract.state(),
            contract.tiers(),
        );

        let owner = Field::from_result("owner", &address, owner);
        let state = Field::from_result("state", &address, state);
        let is_owner = owner
            .value()
            .map(|owner| readmodel::is_owner(account.as_ref(), owner))
            .unwrap_or(false);
        let deadline_date = summary
            .deadline
            .value()
            .and_then(|d| readmodel::deadline_date(*d));

        CampaignDetail {
            status_label: state.value().map(|s| s.label().to_string()),
            tiers: Field::from_result("tiers", &address, tiers),
            deadline_date,
            is_owner,
            owner,
            state,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::abi::Token;
    use crate::chain::ReadCache;
    use crate::contract::campaign::BALANCE;
    use crate::testing::{address, MockCampaign, MockChain};
    use std::time::Duration;

    const NOW: u64 = 1_700_000_000;

    fn service(mock: &Arc<MockChain>) -> CampaignService {
        let client = Arc::new(CachingClient::new(
            mock.clone(),
            ReadCache::new(Duration::from_secs(60)),
        ));
        CampaignService::new(client, address(0xfa))
    }

    #[tokio::test]
    async fn test_summary() {
        let mock = Arc::new(MockChain::new());
        mock.set_campaign(
            address(1),
            &MockCampaign::new("Orchard", address(0xaa))
                .funding(1000, 250)
                .deadline(NOW + 200_000),
        );

        let summary = service(&mock).summary(address(1), NOW).await;
        assert_eq!(summary.name.value().map(String::as_str), Some("Orchard"));
        assert_eq!(summary.read_model.percentage, Some(25.0));
        assert_eq!(summary.read_model.days_left_label.as_deref(), Some("2 days left"));
    }

    #[tokio::test]
    async fn test_failed_field_is_unavailable() {
        let mock = Arc::new(MockChain::new());
        mock.set_campaign(
            address(1),
            &MockCampaign::new("Orchard", address(0xaa)).deadline(NOW + 90_000),
        );
        mock.set_unavailable(address(1), BALANCE, &[]);

        let summary = service(&mock).summary(address(1), NOW).await;
        assert!(!summary.balance.is_available());
        assert!(summary.name.is_available());
        assert_eq!(summary.read_model.percentage, None);
        assert_eq!(summary.read_model.days_left_label.as_deref(), Some("1 day left"));
    }

    #[tokio::test]
    async fn test_detail_owner_check() {
        let mock = Arc::new(MockChain::new());
        let owner: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        mock.set_campaign(
            address(1),
            &MockCampaign::new("Orchard", owner).tier("Seed", 10, 2),
        );
        let service = service(&mock);

        let as_owner: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        let detail = service.detail(address(1), Some(as_owner), NOW).await;
        assert!(detail.is_owner);
        assert_eq!(detail.status_label.as_deref(), Some("Active"));
        assert_eq!(detail.tiers.value().map(Vec::len), Some(1));

        let detail = service.detail(address(1), Some(address(0xbb)), NOW).await;
        assert!(!detail.is_owner);

        let detail = service.detail(address(1), None, NOW).await;
        assert!(!detail.is_owner);
    }

    #[tokio::test]
    async fn test_empty_listing_issues_no_item_queries() {
        let mock = Arc::new(MockChain::new());
        mock.set_return(
            address(0xfa),
            crate::contract::factory::GET_ALL_CAMPAIGNS,
            &[],
            &[Token::Array(vec![])],
        );

        let entries = service(&mock).list_all().await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_single_field_reads_are_independent() {
        let mock = Arc::new(MockChain::new());
        mock.set_campaign(
            address(1),
            &MockCampaign::new("Orchard", address(0xaa))
                .funding(1000, 250)
                .deadline(NOW + 200_000),
        );
        mock.set_unavailable(address(1), BALANCE, &[]);
        let service = service(&mock);

        let name = service.field(address(1), CampaignField::Name, NOW).await;
        assert_eq!(name.reading, Field::Ok { value: FieldValue::Text("Orchard".to_string()) });
        assert_eq!(mock.call_count(), 1);

        let deadline = service.field(address(1), CampaignField::Deadline, NOW).await;
        assert_eq!(deadline.label.as_deref(), Some("2 days left"));

        let balance = service.field(address(1), CampaignField::Balance, NOW).await;
        assert!(!balance.reading.is_available());
        assert_eq!(balance.label, None);

        let progress = service.field(address(1), CampaignField::Progress, NOW).await;
        assert!(!progress.reading.is_available());

        let goal = service.field(address(1), CampaignField::Goal, NOW).await;
        assert_eq!(goal.reading.value(), Some(&FieldValue::Amount(Amount(1000))));
    }

    #[tokio::test]
    async fn test_progress_and_state_labels() {
        let mock = Arc::new(MockChain::new());
        mock.set_campaign(
            address(1),
            &MockCampaign::new("Orchard", address(0xaa)).funding(1000, 333),
        );
        let service = service(&mock);

        let progress = service.field(address(1), CampaignField::Progress, NOW).await;
        assert_eq!(progress.label.as_deref(), Some("33%"));

        let state = service.field(address(1), CampaignField::State, NOW).await;
        assert_eq!(state.label.as_deref(), Some("Active"));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["field"], "state");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["value"]["kind"], "active");
    }

    #[test]
    fn test_field_names() {
        for field in CampaignField::ALL {
            assert_eq!(field.as_str().parse::<CampaignField>(), Ok(field));
        }
        assert!("treasury".parse::<CampaignField>().is_err());
    }

    #[test]
    fn test_field_serialization() {
        let ok: Field<Amount> = Field::Ok { value: Amount(5) };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"status": "ok", "value": "5"})
        );

        let missing: Field<Amount> = Field::Unavailable {
            error: "RPC provider unavailable".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&missing).unwrap()["status"],
            "unavailable"
        );
    }
}
