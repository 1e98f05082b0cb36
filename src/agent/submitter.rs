//! Transfer construction and submission

use crate::{
    config::AgentConfig,
    error::{AgentError, Result},
    rpc::{ChainNode, TokenContract},
    signer::{sign_transfer, Credential, SamplingPolicy},
    types::{TransferReceipt, TransferRequest},
};
use ethers::types::{Address, TransactionReceipt, H256, U256};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::debug;

/// Builds, signs and broadcasts token transfers
///
/// One attempt per call, no retries. Every step can fail; the error is
/// returned to the caller, which logs it and moves on to the next wallet.
#[derive(Debug, Clone)]
pub struct TransactionSubmitter {
    policy: SamplingPolicy,
    chain_id: Option<u64>,
    await_receipt: bool,
    receipt_timeout: Duration,
    receipt_poll_interval: Duration,
}

impl TransactionSubmitter {
    /// Create a submitter from the agent configuration
    pub fn new(config: &AgentConfig) -> Result<Self> {
        Ok(Self {
            policy: SamplingPolicy::from_config(config)?,
            chain_id: config.chain_id,
            await_receipt: config.await_receipt,
            receipt_timeout: config.receipt_timeout(),
            receipt_poll_interval: config.receipt_poll_interval(),
        })
    }

    /// Sampling bounds for gas limits and amounts
    pub fn policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    /// Transfer `amount` base units from `sender` to `recipient`.
    ///
    /// Steps: encode the call, sample a gas limit, query gas price, nonce and
    /// chain ID, sign, broadcast and optionally wait for the receipt. The nonce
    /// is fetched fresh every attempt; there is no local nonce tracking.
    pub async fn submit<N: ChainNode>(
        &self,
        contract: &TokenContract<'_, N>,
        sender: &Credential,
        recipient: Address,
        amount: U256,
    ) -> Result<TransferReceipt> {
        let node = contract.node();

        let request = self
            .build_request(contract, sender.address(), recipient, amount)
            .await?;
        debug!("🔍 Transfer request: {:?}", request);

        let raw = sign_transfer(&request, sender)?;
        debug!("🔏 Signed transfer for {:?}: 0x{}", request.from, hex::encode(&raw));

        let transaction_hash = node.send_raw_transaction(raw).await?;
        debug!("📤 Broadcast {:#x} via {}", transaction_hash, node.endpoint());

        let block_number = if self.await_receipt {
            let receipt = self.wait_for_receipt(node, transaction_hash).await?;
            if receipt.status.map(|s| s.as_u64()) == Some(0) {
                return Err(AgentError::contract_revert(format!(
                    "Transaction {:#x} reverted",
                    transaction_hash
                )));
            }
            receipt.block_number.map(|b| b.as_u64())
        } else {
            None
        };

        Ok(TransferReceipt {
            transaction_hash,
            block_number,
            request,
        })
    }

    async fn build_request<N: ChainNode>(
        &self,
        contract: &TokenContract<'_, N>,
        from: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<TransferRequest> {
        let node = contract.node();

        let data = contract.encode_transfer(recipient, amount)?;
        let gas_limit = self.policy.sample_gas_limit(&mut rand::thread_rng());
        let gas_price = node.gas_price().await?;
        let nonce = node.transaction_count(from).await?;
        let chain_id = match self.chain_id {
            Some(chain_id) => chain_id,
            None => node.chain_id().await?,
        };

        Ok(TransferRequest {
            from,
            recipient,
            contract: contract.address(),
            amount,
            gas_limit,
            gas_price,
            nonce,
            chain_id,
            data,
        })
    }

    async fn wait_for_receipt<N: ChainNode>(&self, node: &N, hash: H256) -> Result<TransactionReceipt> {
        let poll = async {
            loop {
                if let Some(receipt) = node.transaction_receipt(hash).await? {
                    return Ok::<_, AgentError>(receipt);
                }
                sleep(self.receipt_poll_interval).await;
            }
        };

        timeout(self.receipt_timeout, poll).await.map_err(|_| {
            AgentError::timeout(format!(
                "Transaction {:#x} not mined within {:?}",
                hash, self.receipt_timeout
            ))
        })?
    }
}
