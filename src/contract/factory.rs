//! Campaign factory binding
//!
//! The factory enumerates campaigns and creates new ones. Creation uses the
//! direct `createCampaign` call; the factory deploys the campaign contract
//! and records the caller as its owner.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{decode_one, take_tuple, PreparedTransaction};
use crate::chain::abi::{encode_call, ParamType, Token};
use crate::chain::{Address, Amount, CachingClient, ChainClient, ChainError, ChainResult};

pub const GET_ALL_CAMPAIGNS: &str = "getAllCampaigns()";
pub const GET_USER_CAMPAIGNS: &str = "getUserCampaigns(address)";
pub const CREATE_CAMPAIGN: &str = "createCampaign(string,string,uint256,uint256)";

/// A campaign record kept by the factory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignEntry {
    pub campaign_address: Address,
    pub campaign_owner: Address,
    pub name: String,
    /// Unix seconds
    pub creation_time: u64,
}

#[derive(Clone)]
pub struct FactoryContract {
    address: Address,
    client: Arc<CachingClient>,
}

impl FactoryContract {
    pub fn new(address: Address, client: Arc<CachingClient>) -> Self {
        Self { address, client }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn all_campaigns(&self) -> ChainResult<Vec<CampaignEntry>> {
        let data = self
            .client
            .call(self.address, encode_call(GET_ALL_CAMPAIGNS, &[]))
            .await?;
        decode_entries(&data)
    }

    pub async fn user_campaigns(&self, owner: Address) -> ChainResult<Vec<CampaignEntry>> {
        let data = self
            .client
            .call(self.address, user_campaigns_call(owner))
            .await?;
        decode_entries(&data)
    }

    /// Owned campaigns read straight from the chain
    pub async fn user_campaigns_fresh(&self, owner: Address) -> ChainResult<Vec<CampaignEntry>> {
        let data = self
            .client
            .call_fresh(self.address, user_campaigns_call(owner))
            .await?;
        decode_entries(&data)
    }

    pub fn create_campaign(
        &self,
        name: &str,
        description: &str,
        goal: Amount,
        duration_days: u64,
    ) -> PreparedTransaction {
        let calldata = encode_call(
            CREATE_CAMPAIGN,
            &[
                Token::String(name.to_string()),
                Token::String(description.to_string()),
                Token::Uint(goal.get()),
                Token::Uint(duration_days as u128),
            ],
        );
        PreparedTransaction::new(self.address, CREATE_CAMPAIGN, calldata, 0)
    }
}

fn user_campaigns_call(owner: Address) -> Vec<u8> {
    encode_call(GET_USER_CAMPAIGNS, &[Token::Address(owner)])
}

fn entries_type() -> ParamType {
    ParamType::Array(Box::new(ParamType::Tuple(vec![
        ParamType::Address,
        ParamType::Address,
        ParamType::String,
        ParamType::Uint,
    ])))
}

fn decode_entries(data: &[u8]) -> ChainResult<Vec<CampaignEntry>> {
    decode_one(entries_type(), data)?
        .into_array()?
        .into_iter()
        .map(|item| -> ChainResult<CampaignEntry> {
            let [campaign_address, campaign_owner, name, creation_time] = take_tuple::<4>(item)?;
            let creation_time = creation_time.into_uint()?;
            Ok(CampaignEntry {
                campaign_address: campaign_address.into_address()?,
                campaign_owner: campaign_owner.into_address()?,
                name: name.into_string()?,
                creation_time: u64::try_from(creation_time).map_err(|_| {
                    ChainError::InvalidResponse(format!("creation time {}", creation_time))
                })?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ReadCache;
    use crate::testing::{address, entry_token, MockChain};
    use std::time::Duration;

    fn entry(campaign: u8, owner: u8, name: &str, created: u64) -> CampaignEntry {
        CampaignEntry {
            campaign_address: address(campaign),
            campaign_owner: address(owner),
            name: name.to_string(),
            creation_time: created,
        }
    }

    fn setup() -> (Arc<MockChain>, FactoryContract) {
        let mock = Arc::new(MockChain::new());
        let client = Arc::new(CachingClient::new(
            mock.clone(),
            ReadCache::new(Duration::from_secs(60)),
        ));
        (mock, FactoryContract::new(address(0xfa), client))
    }

    #[tokio::test]
    async fn test_all_campaigns() {
        let (mock, factory) = setup();
        let entries = vec![entry(1, 0xaa, "One", 100), entry(2, 0xbb, "Two", 200)];
        mock.set_return(
            address(0xfa),
            GET_ALL_CAMPAIGNS,
            &[],
            &[Token::Array(entries.iter().map(entry_token).collect())],
        );

        assert_eq!(factory.all_campaigns().await.unwrap(), entries);
    }

    #[tokio::test]
    async fn test_user_campaigns_keyed_by_owner() {
        let (mock, factory) = setup();
        mock.set_return(
            address(0xfa),
            GET_USER_CAMPAIGNS,
            &[Token::Address(address(0xaa))],
            &[Token::Array(vec![entry_token(&entry(1, 0xaa, "Mine", 5))])],
        );
        mock.set_return(
            address(0xfa),
            GET_USER_CAMPAIGNS,
            &[Token::Address(address(0xbb))],
            &[Token::Array(vec![])],
        );

        assert_eq!(factory.user_campaigns(address(0xaa)).await.unwrap().len(), 1);
        assert!(factory.user_campaigns(address(0xbb)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_campaign_calldata() {
        let (_mock, factory) = setup();
        let tx = factory.create_campaign("Library", "Books for all", Amount(1000), 30);
        assert_eq!(tx.to, address(0xfa));
        assert_eq!(tx.method, CREATE_CAMPAIGN);
        assert_eq!(tx.value, "0x0");
    }
}
