//! In-memory chain used by unit tests

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::chain::abi::{encode, encode_call, Token};
use crate::chain::{Address, Amount, ChainClient, ChainError, ChainResult, TransactionReceipt, TxHash};
use crate::contract::{CampaignEntry, Tier};

enum Reply {
    Data(Vec<u8>),
    Revert(Option<String>),
    Down,
}

/// Scripted [`ChainClient`]: calls answer from a table, receipts from a queue
pub struct MockChain {
    chain_id: u64,
    calls: Mutex<HashMap<(Address, Vec<u8>), Reply>>,
    receipts: Mutex<HashMap<TxHash, VecDeque<Option<TransactionReceipt>>>>,
    call_count: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::with_chain_id(7001)
    }

    pub fn with_chain_id(chain_id: u64) -> Self {
        Self {
            chain_id,
            calls: Mutex::new(HashMap::new()),
            receipts: Mutex::new(HashMap::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn set_call(&self, to: Address, calldata: Vec<u8>, result: Vec<u8>) {
        self.calls
            .lock()
            .unwrap()
            .insert((to, calldata), Reply::Data(result));
    }

    /// Answer `signature(args)` on `to` with the encoded `outputs`
    pub fn set_return(&self, to: Address, signature: &str, args: &[Token], outputs: &[Token]) {
        self.set_call(to, encode_call(signature, args), encode(outputs));
    }

    pub fn set_revert(&self, to: Address, signature: &str, args: &[Token], reason: &str) {
        self.calls.lock().unwrap().insert(
            (to, encode_call(signature, args)),
            Reply::Revert(Some(reason.to_string())),
        );
    }

    /// Make `signature(args)` on `to` fail as if the provider were down
    pub fn set_unavailable(&self, to: Address, signature: &str, args: &[Token]) {
        self.calls
            .lock()
            .unwrap()
            .insert((to, encode_call(signature, args)), Reply::Down);
    }

    /// Queue the answers successive receipt lookups for `hash` will get.
    /// The last answer repeats once the queue is drained.
    pub fn queue_receipts(&self, hash: TxHash, answers: Vec<Option<TransactionReceipt>>) {
        self.receipts
            .lock()
            .unwrap()
            .insert(hash, answers.into_iter().collect());
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Register every campaign read for `address`
    pub fn set_campaign(&self, address: Address, campaign: &MockCampaign) {
        self.set_return(address, "name()", &[], &[Token::String(campaign.name.clone())]);
        self.set_return(
            address,
            "description()",
            &[],
            &[Token::String(campaign.description.clone())],
        );
        self.set_return(address, "goal()", &[], &[Token::Uint(campaign.goal)]);
        self.set_return(
            address,
            "getContractBalance()",
            &[],
            &[Token::Uint(campaign.balance)],
        );
        self.set_return(
            address,
            "deadline()",
            &[],
            &[Token::Uint(campaign.deadline as u128)],
        );
        self.set_return(address, "owner()", &[], &[Token::Address(campaign.owner)]);
        self.set_return(address, "state()", &[], &[Token::Uint(campaign.state as u128)]);
        self.set_tiers(address, &campaign.tiers);
    }

    pub fn set_tiers(&self, address: Address, tiers: &[Tier]) {
        let tokens = tiers
            .iter()
            .map(|t| {
                Token::Tuple(vec![
                    Token::String(t.name.clone()),
                    Token::Uint(t.amount.get()),
                    Token::Uint(t.backers as u128),
                ])
            })
            .collect();
        self.set_return(address, "getTiers()", &[], &[Token::Array(tokens)]);
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn chain_id(&self) -> ChainResult<u64> {
        Ok(self.chain_id)
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> ChainResult<Vec<u8>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.calls.lock().unwrap().get(&(to, data)) {
            Some(Reply::Data(bytes)) => Ok(bytes.clone()),
            Some(Reply::Revert(reason)) => Err(ChainError::Reverted {
                reason: reason.clone(),
            }),
            Some(Reply::Down) => Err(ChainError::Unavailable),
            None => Err(ChainError::Rpc {
                code: -32000,
                message: "no scripted response".to_string(),
            }),
        }
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<Option<TransactionReceipt>> {
        let mut receipts = self.receipts.lock().unwrap();
        let Some(queue) = receipts.get_mut(&hash) else {
            return Ok(None);
        };
        if queue.len() > 1 {
            Ok(queue.pop_front().flatten())
        } else {
            Ok(queue.front().cloned().flatten())
        }
    }
}

/// Campaign state used to script a [`MockChain`]
#[derive(Debug, Clone)]
pub struct MockCampaign {
    pub name: String,
    pub description: String,
    pub goal: u128,
    pub balance: u128,
    pub deadline: u64,
    pub owner: Address,
    pub state: u8,
    pub tiers: Vec<Tier>,
}

impl MockCampaign {
    pub fn new(name: &str, owner: Address) -> Self {
        Self {
            name: name.to_string(),
            description: format!("{} description", name),
            goal: 1000,
            balance: 250,
            deadline: 0,
            owner,
            state: 0,
            tiers: Vec::new(),
        }
    }

    pub fn deadline(mut self, deadline: u64) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn funding(mut self, goal: u128, balance: u128) -> Self {
        self.goal = goal;
        self.balance = balance;
        self
    }

    pub fn tier(mut self, name: &str, amount: u128, backers: u64) -> Self {
        self.tiers.push(Tier {
            name: name.to_string(),
            amount: Amount(amount),
            backers,
        });
        self
    }
}

pub fn address(byte: u8) -> Address {
    Address::new([byte; 20])
}

pub fn tx_hash(byte: u8) -> TxHash {
    TxHash::new([byte; 32])
}

/// Token form of a factory entry, as `getAllCampaigns()` returns it
pub fn entry_token(entry: &CampaignEntry) -> Token {
    Token::Tuple(vec![
        Token::Address(entry.campaign_address),
        Token::Address(entry.campaign_owner),
        Token::String(entry.name.clone()),
        Token::Uint(entry.creation_time as u128),
    ])
}
