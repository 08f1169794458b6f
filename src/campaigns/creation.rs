//! Campaign Creation
//!
//! Campaigns are created through the factory's `createCampaign` call. The
//! transaction does not hand back the new address to a read-only caller, so
//! once it confirms the creator's campaign list is re-read from the chain and
//! the newest entry is taken as the one just deployed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CampaignService;
use crate::chain::{Address, Amount, ChainResult};
use crate::contract::{CampaignEntry, PreparedTransaction};

/// Input of the "Create Campaign" dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub goal: Amount,
    pub duration_days: u64,
}

impl CampaignDraft {
    pub fn validate(&self) -> Result<(), CreationError> {
        if self.name.trim().is_empty() {
            return Err(CreationError::EmptyName);
        }
        if self.goal.get() == 0 {
            return Err(CreationError::ZeroGoal);
        }
        if self.duration_days == 0 {
            return Err(CreationError::ZeroDuration);
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CreationError {
    #[error("Campaign name must not be empty")]
    EmptyName,

    #[error("Campaign goal must be at least 1")]
    ZeroGoal,

    #[error("Campaign duration must be at least 1 day")]
    ZeroDuration,
}

impl CampaignService {
    pub fn prepare_create_campaign(
        &self,
        draft: &CampaignDraft,
    ) -> Result<PreparedTransaction, CreationError> {
        draft.validate()?;
        tracing::info!(
            name = %draft.name.trim(),
            goal = %draft.goal,
            duration_days = draft.duration_days,
            "Prepared createCampaign"
        );
        Ok(self.factory().create_campaign(
            draft.name.trim(),
            &draft.description,
            draft.goal,
            draft.duration_days,
        ))
    }

    /// Newest campaign owned by `owner`, read bypassing the cache
    pub async fn resolve_created_campaign(&self, owner: Address) -> ChainResult<Option<CampaignEntry>> {
        let entries = self.factory().user_campaigns_fresh(owner).await?;
        // Later entries win ties: the factory appends in creation order
        Ok(entries
            .into_iter()
            .enumerate()
            .max_by_key(|(position, entry)| (entry.creation_time, *position))
            .map(|(_, entry)| entry))
    }
}
