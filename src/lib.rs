//! # TrustFlow
//!
//! Dashboard backend for an on-chain crowdfunding platform. Campaign
//! lifecycle, fund accounting and access control live in the campaign and
//! factory contracts; this crate reads them, derives what the dashboard
//! shows, and prepares the transactions a browser wallet signs.
//!
//! ## Modules
//!
//! - [`chain`]: JSON-RPC client, ABI codec and keyed read cache
//! - [`contract`]: typed bindings for the campaign and factory contracts
//! - [`readmodel`]: pure derivations (funding percentage, days left, owner check)
//! - [`campaigns`]: list/detail services, tier management, creation, receipts
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trustflow::chain::{CachingClient, JsonRpcClient, ReadCache, RpcConfig};
//! use trustflow::campaigns::CampaignService;
//! use trustflow::readmodel::unix_now;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rpc = Arc::new(JsonRpcClient::new(RpcConfig::default())?);
//!     let client = Arc::new(CachingClient::new(rpc, ReadCache::new(std::time::Duration::from_secs(30))));
//!     let service = CampaignService::new(client, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse()?);
//!
//!     for entry in service.list_all().await? {
//!         let summary = service.summary(entry.campaign_address, unix_now()).await;
//!         println!("{}: {:?}", entry.name, summary.read_model.days_left_label);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod campaigns;
pub mod chain;
pub mod config;
pub mod contract;
pub mod readmodel;

#[cfg(test)]
mod testing;

// Re-export top-level types for convenience
pub use chain::{
    Address, Amount, CachingClient, ChainClient, ChainError, ChainResult, JsonRpcClient,
    ReadCache, RpcConfig, TxHash,
};

pub use contract::{
    CampaignContract, CampaignEntry, CampaignStatus, FactoryContract, PreparedTransaction, Tier,
};

pub use campaigns::{
    CampaignDetail, CampaignDraft, CampaignField, CampaignService, CampaignSummary, CreationError,
    Field, FieldReading, FieldValue, TierDraft, TierError, TierExpectation, TxOutcome, TxTracker,
};

pub use readmodel::ReadModel;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, CacheConfig, ChainConfig, Config, ConfigError, LoggingConfig};
