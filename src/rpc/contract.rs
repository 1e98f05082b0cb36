//! ERC20 contract binding and balance reader

use crate::{
    error::{AgentError, Result},
    rpc::ChainNode,
    types::constants::abi::{BALANCE_OF, ERC20_ABI, TRANSFER},
};
use ethers::{
    abi::{Abi, ParamType, Token},
    types::{Address, Bytes, U256},
};
use std::{fs, path::Path};
use tracing::warn;

/// Parse a contract interface definition.
///
/// Accepts either a bare ABI array or a build artifact with an `abi` field,
/// and checks that the `balanceOf` and `transfer` functions are present with
/// ERC20 signatures.
pub fn parse_abi(json: &str) -> Result<Abi> {
    let value: serde_json::Value = serde_json::from_str(json.trim())?;
    let value = match value {
        serde_json::Value::Object(mut artifact) => artifact
            .remove("abi")
            .ok_or_else(|| AgentError::config("Interface definition has no `abi` field"))?,
        other => other,
    };
    let abi: Abi = serde_json::from_value(value)?;
    validate_abi(&abi)?;
    Ok(abi)
}

/// Load a contract interface definition from disk
pub fn load_abi(path: impl AsRef<Path>) -> Result<Abi> {
    let content = fs::read_to_string(path)?;
    parse_abi(&content)
}

/// Built-in minimal ERC20 interface
pub fn default_abi() -> Result<Abi> {
    parse_abi(ERC20_ABI)
}

fn validate_abi(abi: &Abi) -> Result<()> {
    let expect = |name: &str, kinds: &[ParamType]| -> Result<()> {
        let function = abi
            .function(name)
            .map_err(|_| AgentError::config(format!("Interface has no `{}` function", name)))?;
        let inputs: Vec<&ParamType> = function.inputs.iter().map(|p| &p.kind).collect();
        if inputs != kinds.iter().collect::<Vec<_>>() {
            return Err(AgentError::config(format!(
                "`{}` has unexpected inputs {:?}",
                name, inputs
            )));
        }
        Ok(())
    };

    expect(BALANCE_OF, &[ParamType::Address])?;
    expect(TRANSFER, &[ParamType::Address, ParamType::Uint(256)])
}

/// A token contract reached through one node handle
///
/// Created per iteration from that iteration's connection.
pub struct TokenContract<'a, N: ChainNode> {
    node: &'a N,
    address: Address,
    abi: &'a Abi,
}

impl<'a, N: ChainNode> TokenContract<'a, N> {
    /// Bind `abi` at `address` to a node handle
    pub fn new(node: &'a N, address: Address, abi: &'a Abi) -> Self {
        Self { node, address, abi }
    }

    /// Contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Node handle the binding was created from
    pub fn node(&self) -> &'a N {
        self.node
    }

    /// Query `balanceOf(owner)`
    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        let function = self
            .abi
            .function(BALANCE_OF)
            .map_err(|e| AgentError::encoding(e.to_string()))?;
        let data = function
            .encode_input(&[Token::Address(owner)])
            .map_err(|e| AgentError::encoding(format!("Failed to encode balanceOf: {}", e)))?;

        let output = self.node.call(self.address, data.into()).await?;
        let tokens = function
            .decode_output(&output)
            .map_err(|e| AgentError::encoding(format!("Malformed balanceOf response: {}", e)))?;

        match tokens.as_slice() {
            [Token::Uint(balance)] => Ok(*balance),
            other => Err(AgentError::encoding(format!(
                "Unexpected balanceOf output: {:?}",
                other
            ))),
        }
    }

    /// Encode `transfer(to, amount)` call data
    pub fn encode_transfer(&self, to: Address, amount: U256) -> Result<Bytes> {
        let function = self
            .abi
            .function(TRANSFER)
            .map_err(|e| AgentError::encoding(e.to_string()))?;
        function
            .encode_input(&[Token::Address(to), Token::Uint(amount)])
            .map(Bytes::from)
            .map_err(|e| AgentError::encoding(format!("Failed to encode transfer: {}", e)))
    }
}

/// Read a balance, mapping every failure to "unknown" (`None`).
///
/// Network errors, reverts and malformed responses are logged here and never
/// reach the caller, which skips the wallet for this cycle.
pub async fn read_balance<N: ChainNode>(contract: &TokenContract<'_, N>, owner: Address) -> Option<U256> {
    match contract.balance_of(owner).await {
        Ok(balance) => Some(balance),
        Err(e) => {
            warn!("⚠️ Balance unknown for {:?}: {}", owner, e);
            None
        }
    }
}
