//! JSON-RPC Provider Client
//!
//! HTTP client for an Ethereum-compatible JSON-RPC endpoint. Only the three
//! methods the dashboard needs are exposed: `eth_chainId`, `eth_call` and
//! `eth_getTransactionReceipt`. All of them are idempotent reads, so transient
//! transport failures are retried with a short backoff.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::abi::decode_revert_reason;
use super::error::{ChainError, ChainResult};
use super::types::{decode_hex, decode_quantity, encode_hex, Address, TxHash};
use super::{ChainClient, TransactionReceipt};

/// Configuration for the JSON-RPC client
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Provider endpoint (e.g., "http://localhost:8545")
    pub url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum attempts per request
    pub max_retries: u32,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            request_timeout_ms: 10_000,
            max_retries: 3,
        }
    }
}

/// JSON-RPC provider client
pub struct JsonRpcClient {
    client: Client,
    config: RpcConfig,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Create a new client with the given configuration
    pub fn new(config: RpcConfig) -> ChainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// Send a request, retrying transient failures
    async fn request(&self, method: &str, params: Value) -> ChainResult<Value> {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = ChainError::Unavailable;

        for attempt in 0..attempts {
            if attempt > 0 {
                // Backoff: 250ms, 1s, 2.25s...
                let delay = Duration::from_millis(250 * (attempt as u64).pow(2));
                tokio::time::sleep(delay).await;
            }

            match self.send_once(method, params.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => {
                    tracing::debug!(method, attempt, error = %e, "Retrying RPC request");
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(method, attempts, error = %last_error, "RPC request failed");
        Err(last_error)
    }

    async fn send_once(&self, method: &str, params: Value) -> ChainResult<Value> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ChainError::Rpc {
                code: status.as_u16() as i64,
                message: text,
            });
        }

        let envelope: RpcResponse = response.json().await.map_err(map_transport_error)?;
        envelope.into_result()
    }
}

fn map_transport_error(e: reqwest::Error) -> ChainError {
    if e.is_timeout() {
        ChainError::Timeout
    } else if e.is_connect() {
        ChainError::Unavailable
    } else {
        ChainError::Request(e)
    }
}

#[async_trait]
impl ChainClient for JsonRpcClient {
    async fn chain_id(&self) -> ChainResult<u64> {
        let value = self.request("eth_chainId", json!([])).await?;
        let id = parse_quantity_field(&value, "chainId")?;
        u64::try_from(id).map_err(|_| ChainError::InvalidResponse(format!("chain id {}", id)))
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> ChainResult<Vec<u8>> {
        let params = json!([
            { "to": to.to_lower_hex(), "data": encode_hex(&data) },
            "latest"
        ]);

        let value = self.request("eth_call", params).await?;
        let hex = value
            .as_str()
            .ok_or_else(|| ChainError::InvalidResponse("eth_call result is not a string".into()))?;
        Ok(decode_hex(hex)?)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<Option<TransactionReceipt>> {
        let value = self
            .request("eth_getTransactionReceipt", json!([hash.to_string()]))
            .await?;

        if value.is_null() {
            return Ok(None);
        }

        let raw: RawReceipt = serde_json::from_value(value)
            .map_err(|e| ChainError::InvalidResponse(format!("receipt: {}", e)))?;
        raw.into_receipt().map(Some)
    }
}

// ============================================
// Wire types
// ============================================

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcResponse {
    fn into_result(self) -> ChainResult<Value> {
        if let Some(error) = self.error {
            return Err(error.into_chain_error());
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

impl RpcErrorObject {
    /// Providers report reverts as code 3 (geth) or with "revert" in the message
    fn into_chain_error(self) -> ChainError {
        let is_revert = self.code == 3 || self.message.to_lowercase().contains("revert");
        if !is_revert {
            return ChainError::Rpc {
                code: self.code,
                message: self.message,
            };
        }

        let from_data = self
            .data
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|hex| decode_hex(hex).ok())
            .and_then(|bytes| decode_revert_reason(&bytes));

        let from_message = self
            .message
            .split_once("revert")
            .map(|(_, rest)| rest.trim_start_matches(|c: char| c == 'e' || c == 'd' || c == ':'))
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        ChainError::Reverted {
            reason: from_data.or(from_message),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: TxHash,
    block_number: Option<String>,
    status: Option<String>,
}

impl RawReceipt {
    fn into_receipt(self) -> ChainResult<TransactionReceipt> {
        let block_number = match self.block_number.as_deref() {
            Some(n) => u64::try_from(decode_quantity(n)?)
                .map_err(|_| ChainError::InvalidResponse(format!("block number {}", n)))?,
            None => 0,
        };

        let success = match self.status.as_deref() {
            Some(s) => decode_quantity(s)? == 1,
            None => {
                return Err(ChainError::InvalidResponse(
                    "receipt has no status field".to_string(),
                ))
            }
        };

        Ok(TransactionReceipt {
            transaction_hash: self.transaction_hash,
            block_number,
            success,
        })
    }
}

fn parse_quantity_field(value: &Value, field: &str) -> ChainResult<u128> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("{} is not a string", field)))?;
    Ok(decode_quantity(s)?)
}
