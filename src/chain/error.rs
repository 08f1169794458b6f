//! Chain client error types

use thiserror::Error;

use super::abi::AbiError;
use super::types::HexError;

/// Errors raised while talking to the chain
#[derive(Error, Debug)]
pub enum ChainError {
    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider did not answer in time
    #[error("RPC request timed out")]
    Timeout,

    /// Provider could not be reached
    #[error("RPC provider unavailable")]
    Unavailable,

    /// JSON-RPC error object returned by the provider
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The contract rejected the call
    #[error("Execution reverted{}", .reason.as_ref().map(|r| format!(": {}", r)).unwrap_or_default())]
    Reverted { reason: Option<String> },

    /// Return data did not match the expected ABI shape
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Malformed hex in a provider response
    #[error("Hex error: {0}")]
    Hex(#[from] HexError),

    /// Provider response was missing fields or had the wrong shape
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// Provider serves a different network than configured
    #[error("Wrong chain: expected {expected}, provider reports {actual}")]
    WrongChain { expected: u64, actual: u64 },
}

impl ChainError {
    /// Whether the failure is transient and an idempotent read may be retried
    pub fn is_transient(&self) -> bool {
        matches!(self, ChainError::Timeout | ChainError::Unavailable)
    }
}

/// Result type alias for chain operations
pub type ChainResult<T> = Result<T, ChainError>;
