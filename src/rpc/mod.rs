//! JSON-RPC access to the chain
//!
//! The loops only see the [`ChainNode`] and [`Connector`] traits. The
//! production implementation is [`provider::EthersNode`]; tests substitute an
//! in-memory node.

pub mod connector;
pub mod contract;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;

pub use connector::connect_first;
pub use contract::{load_abi, parse_abi, read_balance, TokenContract};
pub use provider::{EthersNode, HttpConnector};

use crate::error::Result;
use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, H256, U256};
use url::Url;

/// A live handle to one node
///
/// Obtained fresh by every loop iteration and dropped at its end.
#[async_trait]
pub trait ChainNode: Send + Sync {
    /// URL this handle talks to
    fn endpoint(&self) -> &str;

    /// Current block height; doubles as the liveness check
    async fn block_number(&self) -> Result<u64>;

    /// Chain ID reported by the node
    async fn chain_id(&self) -> Result<u64>;

    /// Read-only contract call (`eth_call`)
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// Current gas price
    async fn gas_price(&self) -> Result<U256>;

    /// Transaction count of `address`, i.e. its next nonce
    async fn transaction_count(&self, address: Address) -> Result<U256>;

    /// Broadcast a signed transaction and return its hash
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256>;

    /// Receipt of a mined transaction, `None` while pending
    async fn transaction_receipt(&self, hash: H256) -> Result<Option<TransactionReceipt>>;
}

/// Opens node handles for endpoint URLs
#[async_trait]
pub trait Connector: Send + Sync {
    /// Handle type produced by this connector
    type Node: ChainNode;

    /// Create a handle for `endpoint` without probing it
    async fn open(&self, endpoint: &Url) -> Result<Self::Node>;
}
