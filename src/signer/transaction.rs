//! Signing of assembled token transfers

use crate::{
    error::{AgentError, Result},
    signer::Credential,
    types::TransferRequest,
};
use ethers::{signers::Signer, types::Bytes};

/// Sign a transfer with the sender's key and return the raw RLP payload
///
/// The signature is EIP-155 replay-protected with the request's chain ID.
pub fn sign_transfer(request: &TransferRequest, credential: &Credential) -> Result<Bytes> {
    if request.from != credential.address() {
        return Err(AgentError::signing(format!(
            "Request sender {:?} does not match signing wallet {:?}",
            request.from,
            credential.address()
        )));
    }

    let tx = request.to_typed_transaction();
    let wallet = credential.wallet().clone().with_chain_id(request.chain_id);
    let signature = wallet
        .sign_transaction_sync(&tx)
        .map_err(|e| AgentError::signing(format!("Failed to sign transaction: {}", e)))?;

    Ok(tx.rlp_signed(&signature))
}
