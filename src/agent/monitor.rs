//! Read-only balance monitor loop

use crate::{
    agent::{context::AgentContext, schedule::PollTask},
    error::Result,
    rpc::{read_balance, ChainNode, Connector},
    signer::format_base_units,
};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use std::{sync::Arc, time::Duration};
use tracing::info;

/// Balance of one wallet as seen in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    /// Wallet address
    pub address: Address,
    /// `None` when the query failed
    pub balance: Option<U256>,
}

/// Result of one monitor cycle
#[derive(Debug, Clone)]
pub struct MonitorReport {
    /// Endpoint the cycle ran against
    pub endpoint: String,
    /// One entry per wallet, in credential order
    pub balances: Vec<BalanceSnapshot>,
}

impl MonitorReport {
    /// Wallets with a known, nonzero balance; the ones that get logged
    pub fn funded(&self) -> impl Iterator<Item = &BalanceSnapshot> {
        self.balances
            .iter()
            .filter(|s| s.balance.map_or(false, |b| !b.is_zero()))
    }
}

/// Periodically logs every nonzero wallet balance. Never writes to the chain.
pub struct BalanceMonitor<C: Connector> {
    context: Arc<AgentContext<C>>,
}

impl<C: Connector> BalanceMonitor<C> {
    /// Create a monitor over the shared context
    pub fn new(context: Arc<AgentContext<C>>) -> Self {
        Self { context }
    }

    /// One pass: connect, then read every wallet's balance in order.
    ///
    /// Only a failure to reach any endpoint is returned as an error; a failed
    /// balance query leaves that wallet out of the log and the pass goes on.
    pub async fn run_cycle(&self) -> Result<MonitorReport> {
        let node = self.context.connect().await?;
        let contract = self.context.bind(&node);
        let decimals = self.context.config.token_decimals;

        let mut balances = Vec::with_capacity(self.context.credentials.len());
        for credential in self.context.credentials.iter() {
            let address = credential.address();
            let balance = read_balance(&contract, address).await;

            if let Some(amount) = balance.filter(|b| !b.is_zero()) {
                info!(
                    "💰 Balance for {:?}: {}",
                    address,
                    format_base_units(amount, decimals)
                );
            }
            balances.push(BalanceSnapshot { address, balance });
        }

        Ok(MonitorReport {
            endpoint: contract.node().endpoint().to_string(),
            balances,
        })
    }
}

#[async_trait]
impl<C: Connector> PollTask for BalanceMonitor<C> {
    fn name(&self) -> &'static str {
        "balance-monitor"
    }

    fn interval(&self) -> Duration {
        self.context.config.monitor_interval()
    }

    async fn tick(&self) -> Result<()> {
        self.run_cycle().await.map(|_| ())
    }
}
