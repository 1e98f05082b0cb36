//! Configuration for the relay agent

use crate::{
    error::{AgentError, Result},
    types::constants::{amounts::*, contracts::*, endpoints::*, gas::*, timing::*},
};
use ethers::types::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use url::Url;

/// Immutable agent configuration
///
/// Constructed once at startup and passed by reference to the connector, the
/// submitter and both loops. Every field falls back to a built-in default when
/// absent from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// RPC endpoints, tried in order on every cycle
    pub rpc_urls: Vec<Url>,

    /// Token contract address
    pub contract_address: Address,

    /// Token decimals used for unit conversion
    pub token_decimals: u32,

    /// Smallest transfer amount in token units (inclusive)
    pub min_amount: Decimal,

    /// Largest transfer amount in token units (exclusive)
    pub max_amount: Decimal,

    /// Smallest sampled gas limit (inclusive)
    pub gas_limit_min: u64,

    /// Largest sampled gas limit (exclusive)
    pub gas_limit_max: u64,

    /// Seconds between two balance monitor cycles
    pub monitor_interval_secs: u64,

    /// Seconds between two transfer cycles
    pub transfer_interval_secs: u64,

    /// Per-call JSON-RPC timeout in seconds
    pub rpc_timeout_secs: u64,

    /// Chain ID override; queried from the node when unset
    pub chain_id: Option<u64>,

    /// Wait for the broadcast transaction to be mined
    pub await_receipt: bool,

    /// Receipt wait budget in seconds
    pub receipt_timeout_secs: u64,

    /// Delay between receipt lookups in milliseconds
    pub receipt_poll_interval_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            rpc_urls: Url::parse(TAIKO_MAINNET_URL).into_iter().collect(),
            contract_address: DEFAULT_TOKEN_CONTRACT_ADDR.parse().unwrap_or_default(),
            token_decimals: DEFAULT_TOKEN_DECIMALS,
            min_amount: DEFAULT_MIN_AMOUNT,
            max_amount: DEFAULT_MAX_AMOUNT,
            gas_limit_min: DEFAULT_GAS_LIMIT_MIN,
            gas_limit_max: DEFAULT_GAS_LIMIT_MAX,
            monitor_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            transfer_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            chain_id: None,
            await_receipt: true,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
            receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_INTERVAL_MS,
        }
    }
}

impl AgentConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AgentError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(content: &str) -> Result<Self> {
        let config: AgentConfig = serde_json::from_str(content.trim())
            .map_err(|e| AgentError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the loops cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.rpc_urls.is_empty() {
            return Err(AgentError::config("At least one RPC URL is required"));
        }
        if self.min_amount <= Decimal::ZERO {
            return Err(AgentError::config("min_amount must be positive"));
        }
        if self.min_amount >= self.max_amount {
            return Err(AgentError::config(format!(
                "min_amount ({}) must be below max_amount ({})",
                self.min_amount, self.max_amount
            )));
        }
        if self.gas_limit_min >= self.gas_limit_max {
            return Err(AgentError::config(format!(
                "gas_limit_min ({}) must be below gas_limit_max ({})",
                self.gas_limit_min, self.gas_limit_max
            )));
        }
        if self.monitor_interval_secs == 0 || self.transfer_interval_secs == 0 {
            return Err(AgentError::config("Poll intervals must be at least one second"));
        }
        if self.rpc_timeout_secs == 0 {
            return Err(AgentError::config("rpc_timeout_secs must be positive"));
        }
        if self.token_decimals > MAX_TOKEN_DECIMALS {
            return Err(AgentError::config(format!(
                "token_decimals ({}) must be at most {}",
                self.token_decimals, MAX_TOKEN_DECIMALS
            )));
        }
        if self.await_receipt {
            if self.receipt_timeout_secs == 0 {
                return Err(AgentError::config("receipt_timeout_secs must be positive"));
            }
            if self.receipt_poll_interval_ms == 0 {
                return Err(AgentError::config("receipt_poll_interval_ms must be positive"));
            }
        }
        Ok(())
    }

    /// Set the RPC endpoints
    pub fn with_rpc_urls(mut self, rpc_urls: Vec<Url>) -> Self {
        self.rpc_urls = rpc_urls;
        self
    }

    /// Set the token contract
    pub fn with_contract_address(mut self, contract_address: Address) -> Self {
        self.contract_address = contract_address;
        self
    }

    /// Set the chain ID
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Enable or disable waiting for receipts
    pub fn with_await_receipt(mut self, await_receipt: bool) -> Self {
        self.await_receipt = await_receipt;
        self
    }

    /// Delay between balance monitor cycles
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }

    /// Delay between transfer cycles
    pub fn transfer_interval(&self) -> Duration {
        Duration::from_secs(self.transfer_interval_secs)
    }

    /// Per-call JSON-RPC timeout
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    /// Receipt wait budget
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    /// Delay between receipt lookups
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}
