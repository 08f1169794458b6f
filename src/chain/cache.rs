//! Read-Through Cache
//!
//! Contract reads keyed by `(contract address, calldata)`. The calldata is the
//! selector followed by the encoded parameters, so the key is exactly
//! "address + method + params". Entries expire after a TTL and are dropped
//! explicitly for every contract a confirmed transaction touched.
//!
//! Each address carries a generation that invalidation bumps. A read records
//! the generation before it goes to the chain and is stored only if the
//! generation is unchanged when it returns, so a read that straddles an
//! invalidation never repopulates the cache with pre-transaction data.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::error::ChainResult;
use super::types::{Address, TxHash};
use super::{ChainClient, TransactionReceipt};

/// Cache key: one contract read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub address: Address,
    pub calldata: Vec<u8>,
}

impl CacheKey {
    pub fn new(address: Address, calldata: Vec<u8>) -> Self {
        Self { address, calldata }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    inserted_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    generations: HashMap<Address, u64>,
}

/// Keyed store of raw return data
pub struct ReadCache {
    state: RwLock<CacheState>,
    ttl: Duration,
    enabled: bool,
}

impl ReadCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            ttl,
            enabled: true,
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            ttl: Duration::ZERO,
            enabled: false,
        }
    }

    /// Fresh value for `key`, if any
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<u8>> {
        if !self.enabled {
            return None;
        }

        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Current generation of `address`; pass it back to [`ReadCache::insert`]
    pub async fn generation(&self, address: &Address) -> u64 {
        let state = self.state.read().await;
        state.generations.get(address).copied().unwrap_or(0)
    }

    /// Store `value` unless `address` was invalidated since `generation` was read.
    /// Returns whether the value was stored.
    pub async fn insert(&self, key: CacheKey, value: Vec<u8>, generation: u64) -> bool {
        if !self.enabled {
            return false;
        }

        let mut state = self.state.write().await;
        let current = state.generations.get(&key.address).copied().unwrap_or(0);
        if current != generation {
            tracing::debug!(address = %key.address, "Dropped read that raced an invalidation");
            return false;
        }

        // Expired entries are pruned on write so the map stays bounded by
        // the number of distinct reads within one TTL window
        let ttl = self.ttl;
        state.entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        state.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
        true
    }

    /// Drop every cached read of `address`, returning how many were removed.
    /// Reads already in flight for it will not be stored.
    pub async fn invalidate_address(&self, address: &Address) -> usize {
        let mut state = self.state.write().await;
        *state.generations.entry(*address).or_insert(0) += 1;
        let before = state.entries.len();
        state.entries.retain(|key, _| key.address != *address);
        before - state.entries.len()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// A [`ChainClient`] whose reads go through a [`ReadCache`]
pub struct CachingClient {
    inner: Arc<dyn ChainClient>,
    cache: ReadCache,
}

impl CachingClient {
    pub fn new(inner: Arc<dyn ChainClient>, cache: ReadCache) -> Self {
        Self { inner, cache }
    }

    /// Read bypassing the cache. The result still refreshes the cached copy.
    pub async fn call_fresh(&self, to: Address, data: Vec<u8>) -> ChainResult<Vec<u8>> {
        let generation = self.cache.generation(&to).await;
        let result = self.inner.call(to, data.clone()).await?;
        self.cache
            .insert(CacheKey::new(to, data), result.clone(), generation)
            .await;
        Ok(result)
    }

    /// Drop cached reads of every listed contract
    pub async fn invalidate(&self, addresses: &[Address]) {
        for address in addresses {
            let removed = self.cache.invalidate_address(address).await;
            tracing::debug!(address = %address, removed, "Invalidated cached reads");
        }
    }

    pub fn cache(&self) -> &ReadCache {
        &self.cache
    }
}

#[async_trait]
impl ChainClient for CachingClient {
    async fn chain_id(&self) -> ChainResult<u64> {
        self.inner.chain_id().await
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> ChainResult<Vec<u8>> {
        let key = CacheKey::new(to, data);
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        // Failures are never cached
        let generation = self.cache.generation(&to).await;
        let result = self.inner.call(to, key.calldata.clone()).await?;
        self.cache.insert(key, result.clone(), generation).await;
        Ok(result)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<Option<TransactionReceipt>> {
        self.inner.transaction_receipt(hash).await
    }
}
