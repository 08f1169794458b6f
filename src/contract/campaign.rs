//! Campaign contract binding

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{decode_one, take_tuple, PreparedTransaction};
use crate::chain::abi::{encode_call, ParamType, Token};
use crate::chain::{Address, Amount, CachingClient, ChainClient, ChainError, ChainResult};

pub const NAME: &str = "name()";
pub const DESCRIPTION: &str = "description()";
pub const GOAL: &str = "goal()";
pub const BALANCE: &str = "getContractBalance()";
pub const DEADLINE: &str = "deadline()";
pub const OWNER: &str = "owner()";
pub const STATE: &str = "state()";
pub const GET_TIERS: &str = "getTiers()";
pub const ADD_TIER: &str = "addTier(string,uint256)";
pub const REMOVE_TIER: &str = "removeTier(uint256)";
pub const FUND: &str = "fund(uint256)";

/// One funding option of a campaign, addressed by its position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    /// Contribution amount in the smallest currency unit
    pub amount: Amount,
    pub backers: u64,
}

/// Lifecycle state reported by `state()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Successful,
    Failed,
    Unknown(u8),
}

impl CampaignStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => CampaignStatus::Active,
            1 => CampaignStatus::Successful,
            2 => CampaignStatus::Failed,
            other => CampaignStatus::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "Active",
            CampaignStatus::Successful => "Successful",
            CampaignStatus::Failed => "Failed",
            CampaignStatus::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Handle on one deployed campaign
#[derive(Clone)]
pub struct CampaignContract {
    address: Address,
    client: Arc<CachingClient>,
}

impl CampaignContract {
    pub fn new(address: Address, client: Arc<CachingClient>) -> Self {
        Self { address, client }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn read(&self, signature: &str, ty: ParamType) -> ChainResult<Token> {
        let data = self.client.call(self.address, encode_call(signature, &[])).await?;
        decode_one(ty, &data)
    }

    pub async fn name(&self) -> ChainResult<String> {
        Ok(self.read(NAME, ParamType::String).await?.into_string()?)
    }

    pub async fn description(&self) -> ChainResult<String> {
        Ok(self.read(DESCRIPTION, ParamType::String).await?.into_string()?)
    }

    pub async fn goal(&self) -> ChainResult<Amount> {
        Ok(Amount(self.read(GOAL, ParamType::Uint).await?.into_uint()?))
    }

    pub async fn balance(&self) -> ChainResult<Amount> {
        Ok(Amount(self.read(BALANCE, ParamType::Uint).await?.into_uint()?))
    }

    /// Unix seconds
    pub async fn deadline(&self) -> ChainResult<u64> {
        let raw = self.read(DEADLINE, ParamType::Uint).await?.into_uint()?;
        u64::try_from(raw).map_err(|_| ChainError::InvalidResponse(format!("deadline {}", raw)))
    }

    pub async fn owner(&self) -> ChainResult<Address> {
        Ok(self.read(OWNER, ParamType::Address).await?.into_address()?)
    }

    pub async fn state(&self) -> ChainResult<CampaignStatus> {
        let raw = self.read(STATE, ParamType::Uint).await?.into_uint()?;
        let code = u8::try_from(raw)
            .map_err(|_| ChainError::InvalidResponse(format!("state {}", raw)))?;
        Ok(CampaignStatus::from_code(code))
    }

    /// Tiers in contract order, possibly served from cache
    pub async fn tiers(&self) -> ChainResult<Vec<Tier>> {
        let data = self
            .client
            .call(self.address, encode_call(GET_TIERS, &[]))
            .await?;
        decode_tiers(&data)
    }

    /// Tiers read straight from the chain, bypassing the cache
    pub async fn tiers_fresh(&self) -> ChainResult<Vec<Tier>> {
        let data = self
            .client
            .call_fresh(self.address, encode_call(GET_TIERS, &[]))
            .await?;
        decode_tiers(&data)
    }

    pub fn add_tier(&self, name: &str, amount: Amount) -> PreparedTransaction {
        let calldata = encode_call(
            ADD_TIER,
            &[Token::String(name.to_string()), Token::Uint(amount.get())],
        );
        PreparedTransaction::new(self.address, ADD_TIER, calldata, 0)
    }

    pub fn remove_tier(&self, index: usize) -> PreparedTransaction {
        let calldata = encode_call(REMOVE_TIER, &[Token::Uint(index as u128)]);
        PreparedTransaction::new(self.address, REMOVE_TIER, calldata, 0)
    }

    /// Payable: attaches `amount` as the transaction value
    pub fn fund(&self, index: usize, amount: Amount) -> PreparedTransaction {
        let calldata = encode_call(FUND, &[Token::Uint(index as u128)]);
        PreparedTransaction::new(self.address, FUND, calldata, amount.get())
    }
}

fn tiers_type() -> ParamType {
    ParamType::Array(Box::new(ParamType::Tuple(vec![
        ParamType::String,
        ParamType::Uint,
        ParamType::Uint,
    ])))
}

fn decode_tiers(data: &[u8]) -> ChainResult<Vec<Tier>> {
    decode_one(tiers_type(), data)?
        .into_array()?
        .into_iter()
        .map(|item| -> ChainResult<Tier> {
            let [name, amount, backers] = take_tuple::<3>(item)?;
            let backers = backers.into_uint()?;
            Ok(Tier {
                name: name.into_string()?,
                amount: Amount(amount.into_uint()?),
                backers: u64::try_from(backers)
                    .map_err(|_| ChainError::InvalidResponse(format!("backer count {}", backers)))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::abi::selector;
    use crate::chain::types::decode_hex;
    use crate::chain::ReadCache;
    use crate::testing::{address, MockCampaign, MockChain};
    use std::time::Duration;

    fn setup(campaign: &MockCampaign) -> (Arc<MockChain>, CampaignContract) {
        let mock = Arc::new(MockChain::new());
        mock.set_campaign(address(0xc1), campaign);
        let client = Arc::new(CachingClient::new(
            mock.clone(),
            ReadCache::new(Duration::from_secs(60)),
        ));
        (mock, CampaignContract::new(address(0xc1), client))
    }

    #[tokio::test]
    async fn test_reads() {
        let campaign = MockCampaign::new("Solar Roof", address(0xaa))
            .funding(5000, 1200)
            .deadline(1_700_000_000)
            .tier("Bronze", 10, 4)
            .tier("Gold", 100, 1);
        let (_mock, contract) = setup(&campaign);

        assert_eq!(contract.name().await.unwrap(), "Solar Roof");
        assert_eq!(contract.description().await.unwrap(), "Solar Roof description");
        assert_eq!(contract.goal().await.unwrap(), Amount(5000));
        assert_eq!(contract.balance().await.unwrap(), Amount(1200));
        assert_eq!(contract.deadline().await.unwrap(), 1_700_000_000);
        assert_eq!(contract.owner().await.unwrap(), address(0xaa));
        assert_eq!(contract.state().await.unwrap(), CampaignStatus::Active);

        let tiers = contract.tiers().await.unwrap();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[1].name, "Gold");
        assert_eq!(tiers[0].backers, 4);
    }

    #[tokio::test]
    async fn test_fresh_tiers_see_removal() {
        let campaign = MockCampaign::new("Garden", address(0xaa))
            .tier("Seed", 5, 0)
            .tier("Tree", 50, 0);
        let (mock, contract) = setup(&campaign);

        assert_eq!(contract.tiers().await.unwrap().len(), 2);

        mock.set_tiers(address(0xc1), &campaign.tiers[1..]);
        // The cached copy is still served until a fresh read
        assert_eq!(contract.tiers().await.unwrap().len(), 2);
        let fresh = contract.tiers_fresh().await.unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].name, "Tree");
        assert_eq!(contract.tiers().await.unwrap().len(), 1);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CampaignStatus::from_code(1).label(), "Successful");
        assert_eq!(CampaignStatus::from_code(2), CampaignStatus::Failed);
        assert_eq!(CampaignStatus::from_code(9), CampaignStatus::Unknown(9));
    }

    #[tokio::test]
    async fn test_write_calldata() {
        let (_mock, contract) = setup(&MockCampaign::new("Any", address(0xaa)));

        let tx = contract.fund(1, Amount(250));
        let data = decode_hex(&tx.data).unwrap();
        assert_eq!(&data[..4], &selector(FUND));
        assert_eq!(data[35], 1);
        assert_eq!(tx.value, "0xfa");
        assert_eq!(tx.to, address(0xc1));

        let tx = contract.add_tier("Silver", Amount(25));
        assert_eq!(tx.value, "0x0");
        assert_eq!(tx.method, ADD_TIER);
        // selector + offset + amount + length + one padded word of name
        assert_eq!(decode_hex(&tx.data).unwrap().len(), 4 + 4 * 32);
    }
}
