//! Injected Wallet
//!
//! EIP-1193 calls on `window.ethereum`. Signing stays in the wallet; this
//! module only asks for accounts, the chain id and signatures.

use std::fmt;

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::api::PreparedTransaction;
use crate::format::parse_hex_quantity;

/// EIP-1193 "User Rejected Request"
const USER_REJECTED: f64 = 4001.0;

#[derive(Debug, Clone, PartialEq)]
pub enum WalletError {
    /// No injected provider in this browser
    NoProvider,
    /// The user declined in the wallet
    Rejected(String),
    Failed(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::NoProvider => write!(f, "No browser wallet found"),
            WalletError::Rejected(msg) => write!(f, "Rejected in wallet: {}", msg),
            WalletError::Failed(msg) => write!(f, "Wallet error: {}", msg),
        }
    }
}

fn provider() -> Result<Object, WalletError> {
    let window = web_sys::window().ok_or(WalletError::NoProvider)?;
    let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum"))
        .map_err(|_| WalletError::NoProvider)?;
    if ethereum.is_undefined() || ethereum.is_null() {
        return Err(WalletError::NoProvider);
    }
    Ok(ethereum.unchecked_into())
}

/// Split provider errors on their `code`
fn classify(err: JsValue) -> WalletError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    if code == Some(USER_REJECTED) {
        WalletError::Rejected(message)
    } else {
        WalletError::Failed(message)
    }
}

async fn request(method: &str, params: Option<Array>) -> Result<JsValue, WalletError> {
    let ethereum = provider()?;

    let request_fn: Function = Reflect::get(&ethereum, &JsValue::from_str("request"))
        .map_err(classify)?
        .dyn_into()
        .map_err(|_| WalletError::Failed("provider has no request()".to_string()))?;

    let args = Object::new();
    Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
        .map_err(classify)?;
    if let Some(params) = params {
        Reflect::set(&args, &JsValue::from_str("params"), &params).map_err(classify)?;
    }

    let promise: Promise = request_fn
        .call1(&ethereum, &args)
        .map_err(classify)?
        .dyn_into()
        .map_err(|_| WalletError::Failed(format!("{} did not return a promise", method)))?;

    JsFuture::from(promise).await.map_err(classify)
}

fn first_account(value: JsValue) -> Option<String> {
    Array::from(&value).get(0).as_string()
}

/// Prompt the user to connect
pub async fn connect() -> Result<String, WalletError> {
    let accounts = request("eth_requestAccounts", None).await?;
    first_account(accounts).ok_or_else(|| WalletError::Failed("no account returned".to_string()))
}

/// Already-authorized account, without a prompt
pub async fn current_account() -> Result<Option<String>, WalletError> {
    let accounts = request("eth_accounts", None).await?;
    Ok(first_account(accounts))
}

pub async fn chain_id() -> Result<u64, WalletError> {
    let value = request("eth_chainId", None).await?;
    value
        .as_string()
        .as_deref()
        .and_then(parse_hex_quantity)
        .ok_or_else(|| WalletError::Failed(format!("unexpected chain id {:?}", value)))
}

/// Have the wallet sign and broadcast; returns the transaction hash
pub async fn send_transaction(from: &str, tx: &PreparedTransaction) -> Result<String, WalletError> {
    let call = Object::new();
    for (key, value) in [
        ("from", from),
        ("to", tx.to.as_str()),
        ("data", tx.data.as_str()),
        ("value", tx.value.as_str()),
    ] {
        Reflect::set(&call, &JsValue::from_str(key), &JsValue::from_str(value)).map_err(classify)?;
    }

    let params = Array::of1(&call);
    let hash = request("eth_sendTransaction", Some(params)).await?;
    hash.as_string()
        .ok_or_else(|| WalletError::Failed("wallet returned no transaction hash".to_string()))
}
