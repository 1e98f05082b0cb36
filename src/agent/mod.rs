//! Polling loops and the Agent that runs them

#[allow(clippy::module_inception)]
pub mod agent;
pub mod context;
pub mod monitor;
pub mod schedule;
pub mod sender;
pub mod submitter;

pub use agent::Agent;
pub use context::AgentContext;
pub use monitor::{BalanceMonitor, BalanceSnapshot, MonitorReport};
pub use schedule::{run_schedule, PollTask};
pub use sender::{TransferLoop, TransferOutcome, TransferReport};
pub use submitter::TransactionSubmitter;
