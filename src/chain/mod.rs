//! Chain Client
//!
//! Connection to the single network the dashboard targets.
//!
//! - [`ChainClient`]: the seam every read and receipt lookup goes through
//! - [`JsonRpcClient`]: JSON-RPC over HTTP implementation
//! - [`CachingClient`]: keyed read-through cache in front of a client
//! - [`abi`]: selector computation and call/return encoding

pub mod abi;
pub mod cache;
pub mod error;
pub mod rpc;
pub mod types;

pub use cache::{CacheKey, CachingClient, ReadCache};
pub use error::{ChainError, ChainResult};
pub use rpc::{JsonRpcClient, RpcConfig};
pub use types::{Address, Amount, TxHash};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read access to one blockchain network
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Chain identifier reported by the provider
    async fn chain_id(&self) -> ChainResult<u64>;

    /// Execute a read-only contract call against the latest block
    async fn call(&self, to: Address, data: Vec<u8>) -> ChainResult<Vec<u8>>;

    /// Receipt of a mined transaction, `None` while still pending
    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<Option<TransactionReceipt>>;
}

/// The parts of a transaction receipt the dashboard reports on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    /// `true` when execution succeeded, `false` when it reverted
    pub success: bool,
}
