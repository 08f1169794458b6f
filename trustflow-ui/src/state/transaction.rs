//! Sign-then-confirm flow shared by every write.

use crate::api::{self, CampaignEntry, PreparedTransaction, TxKind, WaitResponse};
use crate::state::global::ToastKind;
use crate::state::wallet::{self, WalletError};

/// How a write ended, from the user's point of view
#[derive(Debug, Clone, PartialEq)]
pub enum TxResult {
    Confirmed {
        hash: String,
        created: Option<CampaignEntry>,
    },
    Reverted { hash: String },
    Pending { hash: String },
    Rejected(String),
    Failed(String),
}

impl TxResult {
    fn from_wait(response: WaitResponse) -> Self {
        match response.outcome.as_str() {
            "confirmed" => TxResult::Confirmed {
                hash: response.hash,
                created: response.created_campaign,
            },
            "reverted" => TxResult::Reverted {
                hash: response.hash,
            },
            _ => TxResult::Pending {
                hash: response.hash,
            },
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, TxResult::Confirmed { .. })
    }

    /// Toast for this result; `action` reads like "Tier added"
    pub fn notice(&self, action: &str) -> (ToastKind, String) {
        match self {
            TxResult::Confirmed { hash, created: Some(entry) } => (
                ToastKind::Success,
                format!("{}: {} (tx {})", action, entry.campaign_address, hash),
            ),
            TxResult::Confirmed { hash, created: None } => {
                (ToastKind::Success, format!("{} (tx {})", action, hash))
            }
            TxResult::Reverted { hash } => (
                ToastKind::Reverted,
                format!("Transaction {} reverted by the contract", hash),
            ),
            TxResult::Pending { hash } => (
                ToastKind::Pending,
                format!("Transaction {} not confirmed yet; check again later", hash),
            ),
            TxResult::Rejected(msg) => (ToastKind::Rejected, msg.clone()),
            TxResult::Failed(msg) => (ToastKind::Error, msg.clone()),
        }
    }
}

/// Send `tx` from `from` through the wallet and wait for its receipt
pub async fn sign_and_wait(
    from: &str,
    tx: &PreparedTransaction,
    affected: Vec<String>,
    kind: TxKind,
    owner: Option<String>,
) -> TxResult {
    let hash = match wallet::send_transaction(from, tx).await {
        Ok(hash) => hash,
        Err(WalletError::Rejected(msg)) => return TxResult::Rejected(msg),
        Err(e) => return TxResult::Failed(e.to_string()),
    };

    match api::wait_for_transaction(&hash, affected, kind, owner).await {
        Ok(response) => TxResult::from_wait(response),
        // Broadcast already happened, so an unreachable API leaves it pending
        Err(e) => {
            web_sys::console::warn_1(&format!("Waiting for {} failed: {}", hash, e).into());
            TxResult::Pending { hash }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait(outcome: &str) -> WaitResponse {
        WaitResponse {
            outcome: outcome.to_string(),
            hash: "0xab".to_string(),
            block_number: Some(7),
            created_campaign: None,
        }
    }

    #[test]
    fn test_from_wait() {
        assert!(TxResult::from_wait(wait("confirmed")).is_confirmed());
        assert_eq!(
            TxResult::from_wait(wait("reverted")),
            TxResult::Reverted { hash: "0xab".to_string() }
        );
        assert_eq!(
            TxResult::from_wait(wait("pending")),
            TxResult::Pending { hash: "0xab".to_string() }
        );
    }

    #[test]
    fn test_failures_never_report_success() {
        for result in [
            TxResult::Reverted { hash: "0xab".to_string() },
            TxResult::Pending { hash: "0xab".to_string() },
            TxResult::Rejected("User denied".to_string()),
            TxResult::Failed("boom".to_string()),
        ] {
            assert_ne!(result.notice("Tier added").0, ToastKind::Success);
        }
    }

    #[test]
    fn test_created_campaign_notice_names_address() {
        let result = TxResult::Confirmed {
            hash: "0xab".to_string(),
            created: Some(CampaignEntry {
                campaign_address: "0xc0ffee".to_string(),
                campaign_owner: "0x01".to_string(),
                name: "Solar".to_string(),
                creation_time: 0,
            }),
        };
        let (kind, message) = result.notice("Campaign created");
        assert_eq!(kind, ToastKind::Success);
        assert!(message.contains("0xc0ffee"));
        assert!(message.contains("0xab"));
    }
}
