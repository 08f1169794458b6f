//! Transaction Tracker
//!
//! The wallet signs and submits; the server only watches. [`TxTracker::wait`]
//! polls for the receipt of a submitted hash and, once the transaction is
//! mined, drops every cached read of the contracts it touched so the next
//! render reflects the new state.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::chain::{Address, CachingClient, ChainClient, ChainResult, TxHash};

/// How a submitted transaction ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TxOutcome {
    Confirmed { hash: TxHash, block_number: u64 },
    /// Mined but execution failed; receipts carry no reason
    Reverted { hash: TxHash, block_number: u64 },
    /// No receipt before the timeout. The transaction may still be mined.
    Pending { hash: TxHash },
}

impl TxOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TxOutcome::Confirmed { .. })
    }
}

pub struct TxTracker {
    client: Arc<CachingClient>,
    poll_interval: Duration,
    timeout: Duration,
}

impl TxTracker {
    pub fn new(client: Arc<CachingClient>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            client,
            poll_interval,
            timeout,
        }
    }

    /// Wait for `hash` to be mined, invalidating `affected` once it is
    pub async fn wait(&self, hash: TxHash, affected: &[Address]) -> ChainResult<TxOutcome> {
        let deadline = Instant::now() + self.timeout;
        tracing::debug!(hash = %hash, timeout_secs = self.timeout.as_secs(), "Waiting for receipt");

        loop {
            match self.client.transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    self.client.invalidate(affected).await;

                    let outcome = if receipt.success {
                        TxOutcome::Confirmed {
                            hash,
                            block_number: receipt.block_number,
                        }
                    } else {
                        TxOutcome::Reverted {
                            hash,
                            block_number: receipt.block_number,
                        }
                    };
                    tracing::info!(hash = %hash, block = receipt.block_number, success = receipt.success, "Transaction mined");
                    return Ok(outcome);
                }
                Ok(None) => {}
                Err(e) if e.is_transient() => {
                    tracing::warn!(hash = %hash, error = %e, "Receipt lookup failed, retrying");
                }
                Err(e) => return Err(e),
            }

            if Instant::now() + self.poll_interval > deadline {
                tracing::info!(hash = %hash, "Transaction still pending");
                return Ok(TxOutcome::Pending { hash });
            }
            sleep(self.poll_interval).await;
        }
    }
}
