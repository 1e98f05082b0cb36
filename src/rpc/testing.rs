//! In-memory node used by unit tests

use crate::{
    error::{AgentError, Result},
    rpc::{ChainNode, Connector},
    signer::CredentialSet,
};
use async_trait::async_trait;
use ethers::{
    abi::Token,
    types::{Address, Bytes, TransactionReceipt, H256, U256, U64},
    utils::keccak256,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};
use url::Url;

// Well-known Hardhat/Anvil development keys - DO NOT USE IN PRODUCTION
pub const TEST_KEYS: [&str; 3] = [
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

pub const TEST_CHAIN_ID: u64 = 167000;

/// The first `count` development wallets
pub fn test_credentials(count: usize) -> CredentialSet {
    CredentialSet::from_keys(&TEST_KEYS[..count]).unwrap()
}

#[derive(Debug)]
struct FakeState {
    alive: bool,
    block_number: u64,
    chain_id: u64,
    gas_price: U256,
    balances: HashMap<Address, U256>,
    failing_balances: HashSet<Address>,
    malformed_calls: bool,
    nonces: HashMap<Address, U256>,
    broadcast_error: Option<String>,
    receipt_status: Option<u64>,
    balance_queries: Vec<Address>,
    broadcasts: Vec<Bytes>,
    chain_id_queries: usize,
}

/// Scriptable node; clones share state
#[derive(Debug, Clone)]
pub struct FakeNode {
    endpoint: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeNode {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            state: Arc::new(Mutex::new(FakeState {
                alive: true,
                block_number: 1_000,
                chain_id: TEST_CHAIN_ID,
                gas_price: U256::from(1_000_000_000u64),
                balances: HashMap::new(),
                failing_balances: HashSet::new(),
                malformed_calls: false,
                nonces: HashMap::new(),
                broadcast_error: None,
                receipt_status: Some(1),
                balance_queries: Vec::new(),
                broadcasts: Vec::new(),
                chain_id_queries: 0,
            })),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn down(self) -> Self {
        self.set_alive(false);
        self
    }

    pub fn set_alive(&self, alive: bool) {
        self.state().alive = alive;
    }

    pub fn with_balance(self, owner: Address, balance: U256) -> Self {
        self.state().balances.insert(owner, balance);
        self
    }

    pub fn with_failing_balance(self, owner: Address) -> Self {
        self.state().failing_balances.insert(owner);
        self
    }

    pub fn with_malformed_calls(self) -> Self {
        self.state().malformed_calls = true;
        self
    }

    pub fn with_nonce(self, owner: Address, nonce: u64) -> Self {
        self.state().nonces.insert(owner, U256::from(nonce));
        self
    }

    pub fn with_broadcast_error(self, message: &str) -> Self {
        self.state().broadcast_error = Some(message.to_string());
        self
    }

    /// `None` leaves every broadcast pending forever
    pub fn with_receipt_status(self, status: Option<u64>) -> Self {
        self.state().receipt_status = status;
        self
    }

    pub fn broadcasts(&self) -> Vec<Bytes> {
        self.state().broadcasts.clone()
    }

    pub fn balance_queries(&self) -> Vec<Address> {
        self.state().balance_queries.clone()
    }

    pub fn chain_id_queries(&self) -> usize {
        self.state().chain_id_queries
    }
}

#[async_trait]
impl ChainNode for FakeNode {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn block_number(&self) -> Result<u64> {
        let state = self.state();
        if state.alive {
            Ok(state.block_number)
        } else {
            Err(AgentError::network("connection refused"))
        }
    }

    async fn chain_id(&self) -> Result<u64> {
        let mut state = self.state();
        state.chain_id_queries += 1;
        Ok(state.chain_id)
    }

    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes> {
        let mut state = self.state();
        if data.len() < 36 {
            return Err(AgentError::contract_revert("execution reverted"));
        }
        let owner = Address::from_slice(&data[16..36]);
        state.balance_queries.push(owner);

        if state.failing_balances.contains(&owner) {
            return Err(AgentError::network("connection reset by peer"));
        }
        if state.malformed_calls {
            return Ok(Bytes::new());
        }
        let balance = state.balances.get(&owner).copied().unwrap_or_default();
        Ok(ethers::abi::encode(&[Token::Uint(balance)]).into())
    }

    async fn gas_price(&self) -> Result<U256> {
        Ok(self.state().gas_price)
    }

    async fn transaction_count(&self, address: Address) -> Result<U256> {
        Ok(self.state().nonces.get(&address).copied().unwrap_or_default())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256> {
        let mut state = self.state();
        if let Some(message) = &state.broadcast_error {
            return Err(AgentError::from_rpc_message(message.clone()));
        }
        let hash = H256::from(keccak256(&raw));
        state.broadcasts.push(raw);
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: H256) -> Result<Option<TransactionReceipt>> {
        let state = self.state();
        Ok(state.receipt_status.map(|status| TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(state.block_number + 1)),
            status: Some(U64::from(status)),
            ..Default::default()
        }))
    }
}

/// Hands out registered [`FakeNode`]s and records every probe
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    nodes: HashMap<String, FakeNode>,
    probes: Arc<Mutex<Vec<String>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: FakeNode) -> Self {
        self.nodes.insert(node.endpoint.clone(), node);
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Node = FakeNode;

    async fn open(&self, endpoint: &Url) -> Result<FakeNode> {
        self.probes.lock().unwrap().push(endpoint.to_string());
        self.nodes
            .get(endpoint.as_str())
            .cloned()
            .ok_or_else(|| AgentError::network(format!("{} is unreachable", endpoint)))
    }
}
