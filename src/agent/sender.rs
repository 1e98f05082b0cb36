//! Periodic transfer loop

use crate::{
    agent::{context::AgentContext, schedule::PollTask, submitter::TransactionSubmitter},
    error::{AgentError, Result},
    rpc::{read_balance, ChainNode, Connector},
    signer::format_base_units,
    types::TransferReceipt,
};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

/// What happened to one wallet in one transfer cycle
#[derive(Debug)]
pub enum TransferOutcome {
    /// Transfer broadcast (and mined, when receipts are awaited)
    Sent {
        /// Sending wallet
        sender: Address,
        /// Receipt of the transfer
        receipt: TransferReceipt,
    },
    /// Transfer attempted and failed
    Failed {
        /// Sending wallet
        sender: Address,
        /// Intended recipient
        recipient: Address,
        /// Intended amount in base units
        amount: U256,
        /// Reason
        error: AgentError,
    },
    /// Balance is zero
    SkippedZeroBalance {
        /// Wallet that was skipped
        sender: Address,
    },
    /// Balance could not be read
    SkippedUnknownBalance {
        /// Wallet that was skipped
        sender: Address,
    },
    /// No other wallet to send to
    SkippedNoRecipient {
        /// Wallet that was skipped
        sender: Address,
    },
}

impl TransferOutcome {
    /// Wallet this outcome belongs to
    pub fn sender(&self) -> Address {
        match self {
            Self::Sent { sender, .. }
            | Self::Failed { sender, .. }
            | Self::SkippedZeroBalance { sender }
            | Self::SkippedUnknownBalance { sender }
            | Self::SkippedNoRecipient { sender } => *sender,
        }
    }

    /// Whether a transfer went out
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Result of one transfer cycle
#[derive(Debug)]
pub struct TransferReport {
    /// Endpoint the cycle ran against
    pub endpoint: String,
    /// One entry per wallet, in credential order
    pub outcomes: Vec<TransferOutcome>,
}

impl TransferReport {
    /// Number of transfers that went out
    pub fn sent(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sent()).count()
    }
}

/// Sends a small random amount from every funded wallet to another wallet of
/// the set, once per cycle.
pub struct TransferLoop<C: Connector> {
    context: Arc<AgentContext<C>>,
    submitter: TransactionSubmitter,
}

impl<C: Connector> TransferLoop<C> {
    /// Create a transfer loop over the shared context
    pub fn new(context: Arc<AgentContext<C>>) -> Result<Self> {
        let submitter = TransactionSubmitter::new(&context.config)?;
        Ok(Self { context, submitter })
    }

    /// Submitter used for every transfer
    pub fn submitter(&self) -> &TransactionSubmitter {
        &self.submitter
    }

    /// One pass over every wallet, in order.
    ///
    /// A wallet is skipped when its balance is zero or unknown, or when the set
    /// has no other address to send to. A failed transfer is logged and the
    /// pass moves on; only a failure to reach any endpoint ends the cycle with
    /// an error.
    pub async fn run_cycle(&self) -> Result<TransferReport> {
        let node = self.context.connect().await?;
        let contract = self.context.bind(&node);
        let decimals = self.context.config.token_decimals;

        let mut outcomes = Vec::with_capacity(self.context.credentials.len());
        for credential in self.context.credentials.iter() {
            let sender = credential.address();

            let outcome = match read_balance(&contract, sender).await {
                None => {
                    info!("⏭️ Skipping {:?}: balance unknown", sender);
                    TransferOutcome::SkippedUnknownBalance { sender }
                }
                Some(balance) if balance.is_zero() => {
                    info!("⏭️ Skipping {:?}: zero balance", sender);
                    TransferOutcome::SkippedZeroBalance { sender }
                }
                Some(_) => match self.context.credentials.select_recipient(sender) {
                    None => {
                        warn!("No recipient found for {:?}", sender);
                        TransferOutcome::SkippedNoRecipient { sender }
                    }
                    Some(recipient) => {
                        let amount = self.submitter.policy().sample_amount(&mut rand::thread_rng());
                        info!(
                            "💸 Sending {} from {:?} to {:?}",
                            format_base_units(amount, decimals),
                            sender,
                            recipient
                        );

                        match self.submitter.submit(&contract, credential, recipient, amount).await {
                            Ok(receipt) => {
                                info!("✅ Transaction: {:#x}", receipt.transaction_hash);
                                TransferOutcome::Sent { sender, receipt }
                            }
                            Err(e) => {
                                error!("❌ Failed to send transaction from {:?}: {}", sender, e);
                                TransferOutcome::Failed {
                                    sender,
                                    recipient,
                                    amount,
                                    error: e,
                                }
                            }
                        }
                    }
                },
            };
            outcomes.push(outcome);
        }

        Ok(TransferReport {
            endpoint: contract.node().endpoint().to_string(),
            outcomes,
        })
    }
}

#[async_trait]
impl<C: Connector> PollTask for TransferLoop<C> {
    fn name(&self) -> &'static str {
        "transfer-loop"
    }

    fn interval(&self) -> Duration {
        self.context.config.transfer_interval()
    }

    async fn tick(&self) -> Result<()> {
        let report = self.run_cycle().await?;
        info!(
            "📊 Transfer cycle done on {}: {}/{} sent",
            report.endpoint,
            report.sent(),
            report.outcomes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AgentConfig,
        rpc::{
            contract::default_abi,
            testing::{test_credentials, FakeConnector, FakeNode},
        },
        signer::to_base_units,
    };
    use ethers::{
        abi::Token,
        types::Transaction,
        utils::rlp,
    };
    use url::Url;

    fn transfer_loop(node: FakeNode, wallets: usize) -> TransferLoop<FakeConnector> {
        let config = AgentConfig::default()
            .with_rpc_urls(vec![Url::parse(node.endpoint()).unwrap()])
            .with_await_receipt(false);
        let connector = FakeConnector::new().with_node(node);
        TransferLoop::new(Arc::new(AgentContext::new(
            config,
            test_credentials(wallets),
            default_abi().unwrap(),
            connector,
        )))
        .unwrap()
    }

    fn decode(raw: &[u8]) -> (Address, Address, U256) {
        let tx: Transaction = rlp::decode(raw).unwrap();
        let tokens = default_abi()
            .unwrap()
            .function("transfer")
            .unwrap()
            .decode_input(&tx.input[4..])
            .unwrap();
        match tokens.as_slice() {
            [Token::Address(to), Token::Uint(amount)] => (tx.recover_from().unwrap(), *to, *amount),
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_funded_wallet_sends_to_other_wallet() {
        let addresses = test_credentials(2).addresses();
        let node = FakeNode::new("http://node.test/").with_balance(addresses[0], U256::from(100));
        let transfers = transfer_loop(node.clone(), 2);

        let report = transfers.run_cycle().await.unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert!(matches!(report.outcomes[0], TransferOutcome::Sent { sender, .. } if sender == addresses[0]));
        assert!(matches!(report.outcomes[1], TransferOutcome::SkippedZeroBalance { sender } if sender == addresses[1]));
        assert_eq!(report.sent(), 1);

        let broadcasts = node.broadcasts();
        assert_eq!(broadcasts.len(), 1);
        let (from, to, _) = decode(&broadcasts[0]);
        assert_eq!(from, addresses[0]);
        assert_eq!(to, addresses[1]);
    }

    #[tokio::test]
    async fn test_amount_within_configured_range() {
        let addresses = test_credentials(3).addresses();
        let mut node = FakeNode::new("http://node.test/");
        for address in &addresses {
            node = node.with_balance(*address, U256::exp10(30));
        }
        let transfers = transfer_loop(node.clone(), 3);

        transfers.run_cycle().await.unwrap();

        let config = AgentConfig::default();
        let min = to_base_units(config.min_amount, config.token_decimals).unwrap();
        let max = to_base_units(config.max_amount, config.token_decimals).unwrap();
        let broadcasts = node.broadcasts();
        assert_eq!(broadcasts.len(), 3);
        for raw in &broadcasts {
            let (from, to, amount) = decode(raw);
            assert_ne!(from, to);
            assert!(amount >= min && amount < max, "amount {} out of range", amount);
        }
    }

    #[tokio::test]
    async fn test_broadcast_failure_does_not_stop_cycle() {
        let addresses = test_credentials(2).addresses();
        let node = FakeNode::new("http://node.test/")
            .with_balance(addresses[0], U256::from(100))
            .with_balance(addresses[1], U256::from(100))
            .with_broadcast_error("insufficient funds for gas * price + value");
        let transfers = transfer_loop(node.clone(), 2);

        let report = transfers.run_cycle().await.unwrap();

        assert_eq!(report.sent(), 0);
        assert!(report
            .outcomes
            .iter()
            .all(|o| matches!(o, TransferOutcome::Failed { .. })));
        match &report.outcomes[0] {
            TransferOutcome::Failed { sender, recipient, error, .. } => {
                assert_eq!(*sender, addresses[0]);
                assert_eq!(*recipient, addresses[1]);
                assert!(matches!(error, AgentError::Network(_)));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(node.balance_queries(), addresses);
    }

    #[tokio::test]
    async fn test_single_wallet_never_broadcasts() {
        let addresses = test_credentials(1).addresses();
        let node = FakeNode::new("http://node.test/").with_balance(addresses[0], U256::from(100));
        let transfers = transfer_loop(node.clone(), 1);

        let report = transfers.run_cycle().await.unwrap();

        assert!(matches!(
            report.outcomes.as_slice(),
            [TransferOutcome::SkippedNoRecipient { .. }]
        ));
        assert!(node.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_balance_is_skipped() {
        let addresses = test_credentials(2).addresses();
        let node = FakeNode::new("http://node.test/")
            .with_balance(addresses[0], U256::from(100))
            .with_failing_balance(addresses[0]);
        let transfers = transfer_loop(node.clone(), 2);

        let report = transfers.run_cycle().await.unwrap();

        assert_eq!(report.outcomes[0].sender(), addresses[0]);
        assert!(matches!(report.outcomes[0], TransferOutcome::SkippedUnknownBalance { .. }));
        assert!(matches!(report.outcomes[1], TransferOutcome::SkippedZeroBalance { .. }));
        assert!(node.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_fatal() {
        let transfers = transfer_loop(FakeNode::new("http://node.test/").down(), 2);

        let err = transfers.tick().await.unwrap_err();
        assert!(err.is_fatal());
    }
}
