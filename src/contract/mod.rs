//! Contract Bindings
//!
//! Typed handles over the campaign and factory contracts. Reads go through
//! the [`CachingClient`](crate::chain::CachingClient); writes are never sent
//! from here, they are returned as [`PreparedTransaction`]s for the
//! connected wallet to sign and submit.

pub mod campaign;
pub mod factory;

pub use campaign::{CampaignContract, CampaignStatus, Tier};
pub use factory::{CampaignEntry, FactoryContract};

use serde::{Deserialize, Serialize};

use crate::chain::abi::{decode, ParamType, Token};
use crate::chain::types::{encode_hex, encode_quantity};
use crate::chain::{Address, ChainError, ChainResult};

/// An unsigned transaction ready for `eth_sendTransaction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedTransaction {
    pub to: Address,
    /// `0x`-prefixed calldata
    pub data: String,
    /// Attached value as a `0x` quantity
    pub value: String,
    /// Human-readable signature of the called function
    pub method: String,
}

impl PreparedTransaction {
    pub fn new(to: Address, method: &str, calldata: Vec<u8>, value: u128) -> Self {
        Self {
            to,
            data: encode_hex(&calldata),
            value: encode_quantity(value),
            method: method.to_string(),
        }
    }
}

/// Decode return data that must hold exactly one value of `ty`
fn decode_one(ty: ParamType, data: &[u8]) -> ChainResult<Token> {
    let mut tokens = decode(std::slice::from_ref(&ty), data)?;
    tokens
        .pop()
        .ok_or_else(|| ChainError::InvalidResponse("empty return data".to_string()))
}

fn take_tuple<const N: usize>(token: Token) -> ChainResult<[Token; N]> {
    let items = token.into_tuple()?;
    let found = items.len();
    items.try_into().map_err(|_| {
        ChainError::InvalidResponse(format!("expected a {}-field tuple, found {}", N, found))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepared_transaction_encoding() {
        let tx = PreparedTransaction::new(Address::new([1; 20]), "fund(uint256)", vec![0xca, 0xfe], 500);
        assert_eq!(tx.data, "0xcafe");
        assert_eq!(tx.value, "0x1f4");

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["method"], "fund(uint256)");
    }
}
