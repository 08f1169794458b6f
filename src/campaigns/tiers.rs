//! Tier Management
//!
//! Owner-side `addTier`/`removeTier` and the backer-side `fund`. Tiers are
//! addressed by position, so removal and funding re-read the tier list
//! straight from the chain and check the index still points at the tier the
//! caller saw before a transaction is prepared.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CampaignService;
use crate::chain::{Address, Amount, ChainError};
use crate::contract::{PreparedTransaction, Tier};

/// Input of the "Add Tier" dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDraft {
    pub name: String,
    pub amount: Amount,
}

impl TierDraft {
    pub fn new(name: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }

    pub fn validate(&self) -> Result<(), TierError> {
        if self.name.trim().is_empty() {
            return Err(TierError::EmptyName);
        }
        if self.amount.get() == 0 {
            return Err(TierError::ZeroAmount);
        }
        Ok(())
    }
}

/// The tier a caller believes sits at an index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierExpectation {
    pub name: String,
    pub amount: Amount,
}

impl TierExpectation {
    fn matches(&self, tier: &Tier) -> bool {
        self.name == tier.name && self.amount == tier.amount
    }
}

impl From<&Tier> for TierExpectation {
    fn from(tier: &Tier) -> Self {
        Self {
            name: tier.name.clone(),
            amount: tier.amount,
        }
    }
}

#[derive(Error, Debug)]
pub enum TierError {
    #[error("Tier name must not be empty")]
    EmptyName,

    #[error("Tier amount must be at least 1")]
    ZeroAmount,

    /// The tier list changed since the caller last read it
    #[error("Tier {index} changed: {reason}")]
    Conflict { index: usize, reason: String },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl CampaignService {
    pub fn prepare_add_tier(
        &self,
        campaign: Address,
        draft: &TierDraft,
    ) -> Result<PreparedTransaction, TierError> {
        draft.validate()?;
        let tx = self
            .campaign(campaign)
            .add_tier(draft.name.trim(), draft.amount);
        tracing::info!(campaign = %campaign, name = %draft.name.trim(), amount = %draft.amount, "Prepared addTier");
        Ok(tx)
    }

    pub async fn prepare_remove_tier(
        &self,
        campaign: Address,
        index: usize,
        expected: Option<&TierExpectation>,
    ) -> Result<PreparedTransaction, TierError> {
        self.current_tier(campaign, index, expected).await?;
        tracing::info!(campaign = %campaign, index, "Prepared removeTier");
        Ok(self.campaign(campaign).remove_tier(index))
    }

    /// The attached value is the tier amount from the fresh read
    pub async fn prepare_fund_tier(
        &self,
        campaign: Address,
        index: usize,
        expected: Option<&TierExpectation>,
    ) -> Result<PreparedTransaction, TierError> {
        let tier = self.current_tier(campaign, index, expected).await?;
        tracing::info!(campaign = %campaign, index, amount = %tier.amount, "Prepared fund");
        Ok(self.campaign(campaign).fund(index, tier.amount))
    }

    /// Tier at `index` as the chain has it now
    async fn current_tier(
        &self,
        campaign: Address,
        index: usize,
        expected: Option<&TierExpectation>,
    ) -> Result<Tier, TierError> {
        let mut tiers = self.campaign(campaign).tiers_fresh().await?;
        let count = tiers.len();

        if index >= count {
            tracing::warn!(campaign = %campaign, index, count, "Tier index out of range");
            return Err(TierError::Conflict {
                index,
                reason: format!("campaign has {} tiers", count),
            });
        }

        let tier = tiers.swap_remove(index);
        if let Some(expected) = expected {
            if !expected.matches(&tier) {
                tracing::warn!(campaign = %campaign, index, found = %tier.name, expected = %expected.name, "Tier changed under caller");
                return Err(TierError::Conflict {
                    index,
                    reason: format!(
                        "expected \"{}\" ({}), found \"{}\" ({})",
                        expected.name, expected.amount, tier.name, tier.amount
                    ),
                });
            }
        }

        Ok(tier)
    }
}
