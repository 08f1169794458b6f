//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::campaigns::{CampaignService, TxTracker};
use crate::chain::{CachingClient, ChainClient, ReadCache};
use crate::config::{Config, ConfigError};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Campaign reads and transaction preparation
    pub campaigns: Arc<CampaignService>,
    /// Receipt polling for submitted transactions
    pub tracker: Arc<TxTracker>,
    /// Cached chain client shared by both of the above
    pub client: Arc<CachingClient>,
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Wire the services over `chain` as `config` describes
    pub fn new(config: Config, chain: Arc<dyn ChainClient>) -> Result<Self, ConfigError> {
        let factory = config.chain.factory()?;

        let cache = if config.cache.enabled {
            ReadCache::new(Duration::from_secs(config.cache.ttl_secs))
        } else {
            ReadCache::disabled()
        };
        let client = Arc::new(CachingClient::new(chain, cache));

        let campaigns = Arc::new(CampaignService::new(Arc::clone(&client), factory));
        let tracker = Arc::new(TxTracker::new(
            Arc::clone(&client),
            config.chain.poll_interval(),
            config.chain.confirmation_timeout(),
        ));

        Ok(Self {
            campaigns,
            tracker,
            client,
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
