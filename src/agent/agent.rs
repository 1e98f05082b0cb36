//! Main Agent for the relay
//!
//! Owns the shared context and runs the balance monitor and the transfer loop
//! side by side.

use crate::{
    agent::{
        context::AgentContext,
        monitor::BalanceMonitor,
        schedule::run_schedule,
        sender::TransferLoop,
    },
    config::AgentConfig,
    error::Result,
    rpc::{Connector, HttpConnector},
    signer::CredentialSet,
};
use ethers::abi::Abi;
use std::sync::Arc;
use tracing::info;

/// Main Agent
///
/// Both loops read the same immutable [`AgentContext`]; neither holds state
/// across cycles beyond it.
pub struct Agent<C: Connector> {
    context: Arc<AgentContext<C>>,
    monitor: BalanceMonitor<C>,
    transfers: TransferLoop<C>,
}

impl Agent<HttpConnector> {
    /// Create an Agent that talks JSON-RPC over HTTP
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use token_relay_agent::{rpc::contract::default_abi, Agent, AgentConfig, CredentialSet};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = AgentConfig::load("agent.json")?;
    ///     let credentials = CredentialSet::load("privateKeys.json")?;
    ///
    ///     let agent = Agent::from_config(config, credentials, default_abi()?)?;
    ///     agent.run(None).await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn from_config(config: AgentConfig, credentials: CredentialSet, abi: Abi) -> Result<Self> {
        let connector = HttpConnector::new(config.rpc_timeout());
        Self::new(config, credentials, abi, connector)
    }
}

impl<C: Connector> Agent<C> {
    /// Create an Agent over any connector
    pub fn new(config: AgentConfig, credentials: CredentialSet, abi: Abi, connector: C) -> Result<Self> {
        config.validate()?;

        let context = Arc::new(AgentContext::new(config, credentials, abi, connector));
        let monitor = BalanceMonitor::new(context.clone());
        let transfers = TransferLoop::new(context.clone())?;

        info!(
            "✅ Relay agent initialized: {} wallets, token {:?}, {} endpoints",
            context.credentials.len(),
            context.config.contract_address,
            context.config.rpc_urls.len()
        );

        Ok(Self {
            context,
            monitor,
            transfers,
        })
    }

    /// Shared context
    pub fn context(&self) -> &AgentContext<C> {
        &self.context
    }

    /// Balance monitor loop
    pub fn monitor(&self) -> &BalanceMonitor<C> {
        &self.monitor
    }

    /// Transfer loop
    pub fn transfers(&self) -> &TransferLoop<C> {
        &self.transfers
    }

    /// Run both loops concurrently.
    ///
    /// Without `max_cycles` this only returns on a fatal error, which also
    /// stops the other loop. With `max_cycles` each loop runs that many cycles
    /// and the call returns once both are done.
    pub async fn run(&self, max_cycles: Option<u64>) -> Result<()> {
        let (monitor_cycles, transfer_cycles) = tokio::try_join!(
            run_schedule(&self.monitor, max_cycles),
            run_schedule(&self.transfers, max_cycles),
        )?;

        info!(
            "🏁 Relay agent finished: {} monitor cycles, {} transfer cycles",
            monitor_cycles, transfer_cycles
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AgentError,
        rpc::{
            contract::default_abi,
            testing::{test_credentials, FakeConnector, FakeNode},
        },
    };
    use ethers::types::U256;
    use tokio_test::{assert_err, assert_ok};
    use url::Url;

    fn config(endpoints: &[&str]) -> AgentConfig {
        AgentConfig::default()
            .with_rpc_urls(endpoints.iter().map(|e| Url::parse(e).unwrap()).collect())
            .with_await_receipt(false)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut bad = config(&["http://node.test/"]);
        bad.gas_limit_min = bad.gas_limit_max;

        let result = Agent::new(bad, test_credentials(2), default_abi().unwrap(), FakeConnector::new());
        assert!(matches!(result.err(), Some(AgentError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_both_loops() {
        let addresses = test_credentials(2).addresses();
        let node = FakeNode::new("http://node.test/").with_balance(addresses[0], U256::from(100));
        let connector = FakeConnector::new().with_node(node.clone());
        let agent = Agent::new(
            config(&["http://node.test/"]),
            test_credentials(2),
            default_abi().unwrap(),
            connector.clone(),
        )
        .unwrap();

        assert_ok!(agent.run(Some(2)).await);

        // Two cycles per loop, one probe per cycle
        assert_eq!(connector.probes().len(), 4);
        // Only the transfer loop broadcasts: wallet A once per cycle
        assert_eq!(node.broadcasts().len(), 2);
        // Monitor and transfer loop each read both wallets every cycle
        assert_eq!(node.balance_queries().len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_endpoints_down_is_fatal() {
        let connector = FakeConnector::new()
            .with_node(FakeNode::new("http://a.test/").down())
            .with_node(FakeNode::new("http://b.test/").down());
        let agent = Agent::new(
            config(&["http://a.test/", "http://b.test/"]),
            test_credentials(2),
            default_abi().unwrap(),
            connector,
        )
        .unwrap();

        let err = assert_err!(agent.run(None).await);
        assert!(matches!(err, AgentError::NoEndpointAvailable { tried: 2 }));
        assert!(err.is_fatal());
    }
}
