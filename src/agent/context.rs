//! Shared agent state

use crate::{
    config::AgentConfig,
    error::Result,
    rpc::{connect_first, Connector, TokenContract},
    signer::CredentialSet,
};
use ethers::abi::Abi;

/// Read-only state shared by both loops
///
/// Nothing in here changes after startup, so the loops share it without
/// locking.
#[derive(Debug)]
pub struct AgentContext<C: Connector> {
    /// Agent configuration
    pub config: AgentConfig,
    /// Wallets, in processing order
    pub credentials: CredentialSet,
    /// Token interface definition
    pub abi: Abi,
    /// Opens node handles
    pub connector: C,
}

impl<C: Connector> AgentContext<C> {
    /// Create a new context
    pub fn new(config: AgentConfig, credentials: CredentialSet, abi: Abi, connector: C) -> Self {
        Self {
            config,
            credentials,
            abi,
            connector,
        }
    }

    /// Fresh connection to the first live endpoint
    pub async fn connect(&self) -> Result<C::Node> {
        connect_first(&self.connector, &self.config.rpc_urls).await
    }

    /// Bind the token contract to a connection
    pub fn bind<'a>(&'a self, node: &'a C::Node) -> TokenContract<'a, C::Node> {
        TokenContract::new(node, self.config.contract_address, &self.abi)
    }
}
