//! ethers-backed node handle

use crate::{
    error::{AgentError, Result},
    rpc::{ChainNode, Connector},
};
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider, ProviderError},
    types::{
        transaction::eip2718::TypedTransaction, Address, Bytes, TransactionReceipt,
        TransactionRequest, H256, U256,
    },
};
use std::{future::Future, time::Duration};
use tokio::time::timeout;
use url::Url;

/// Node handle over HTTP JSON-RPC
///
/// Every call is bounded by the configured RPC timeout.
#[derive(Debug, Clone)]
pub struct EthersNode {
    provider: Provider<Http>,
    endpoint: String,
    timeout: Duration,
}

impl EthersNode {
    /// Create a handle; no request is made until the first call
    pub fn new(endpoint: &Url, timeout: Duration) -> Self {
        Self {
            provider: Provider::new(Http::new(endpoint.clone())),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    /// Underlying ethers provider
    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }

    async fn timed<T, F>(&self, method: &str, request: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, ProviderError>> + Send,
    {
        match timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AgentError::from_rpc_message(format!("{} failed: {}", method, e))),
            Err(_) => Err(AgentError::timeout(format!(
                "{} on {} after {:?}",
                method, self.endpoint, self.timeout
            ))),
        }
    }
}

#[async_trait]
impl ChainNode for EthersNode {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn block_number(&self) -> Result<u64> {
        let height = self
            .timed("eth_blockNumber", self.provider.get_block_number())
            .await?;
        Ok(height.as_u64())
    }

    async fn chain_id(&self) -> Result<u64> {
        let chain_id = self.timed("eth_chainId", self.provider.get_chainid()).await?;
        Ok(chain_id.low_u64())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        self.timed("eth_call", self.provider.call(&tx, None)).await
    }

    async fn gas_price(&self) -> Result<U256> {
        self.timed("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn transaction_count(&self, address: Address) -> Result<U256> {
        self.timed(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address, None),
        )
        .await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256> {
        self.timed("eth_sendRawTransaction", async {
            self.provider
                .send_raw_transaction(raw)
                .await
                .map(|pending| pending.tx_hash())
        })
        .await
    }

    async fn transaction_receipt(&self, hash: H256) -> Result<Option<TransactionReceipt>> {
        self.timed(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(hash),
        )
        .await
    }
}

/// Opens [`EthersNode`] handles
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    /// Create a connector whose handles use `timeout` per call
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    type Node = EthersNode;

    async fn open(&self, endpoint: &Url) -> Result<EthersNode> {
        Ok(EthersNode::new(endpoint, self.timeout))
    }
}
