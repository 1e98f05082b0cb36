//! Transfer data model

use ethers::types::{
    transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest, H256, U256, U64,
};
use serde::{Deserialize, Serialize};

/// Fully assembled token transfer, ready to be signed
///
/// Built, signed and discarded within one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Sending wallet
    pub from: Address,
    /// Receiving wallet (the `to` argument of `transfer`)
    pub recipient: Address,
    /// Token contract the call is sent to
    pub contract: Address,
    /// Amount in the token's smallest unit
    pub amount: U256,
    /// Sampled gas limit
    #[serde(rename = "gasLimit")]
    pub gas_limit: u64,
    /// Node-reported gas price
    #[serde(rename = "gasPrice")]
    pub gas_price: U256,
    /// Sender's transaction count at build time
    pub nonce: U256,
    /// Chain the signature is bound to
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    /// Encoded `transfer(recipient, amount)` call
    pub data: Bytes,
}

impl TransferRequest {
    /// Legacy (gas-price) transaction calling the token contract
    pub fn to_typed_transaction(&self) -> TypedTransaction {
        TransactionRequest::new()
            .from(self.from)
            .to(self.contract)
            .value(U256::zero())
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .nonce(self.nonce)
            .data(self.data.clone())
            .chain_id(U64::from(self.chain_id))
            .into()
    }
}

/// Result of a successful broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Transaction hash reported by the node
    #[serde(rename = "transactionHash")]
    pub transaction_hash: H256,
    /// Block the transaction was mined in, when the receipt was awaited
    #[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// The request that was broadcast
    pub request: TransferRequest,
}
