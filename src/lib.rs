//! # Token Relay Agent
//!
//! A polling agent that watches ERC-20 balances across a set of wallets and
//! relays small randomized transfers between them.
//!
//! ## Features
//!
//! - **Endpoint Failover**: every cycle connects to the first live JSON-RPC endpoint
//! - **Balance Monitor**: logs every nonzero wallet balance on a fixed interval
//! - **Transfer Loop**: sends a random amount from each funded wallet to another wallet of the set
//! - **Local Signing**: legacy transactions signed with the wallet key and broadcast raw
//! - **Error Handling**: typed errors separating fatal startup failures from per-wallet ones
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use token_relay_agent::{rpc::load_abi, Agent, AgentConfig, CredentialSet};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AgentConfig::default().with_chain_id(167000);
//!     let credentials = CredentialSet::load("privateKeys.json")?;
//!     let abi = load_abi("abi.json")?;
//!
//!     let agent = Agent::from_config(config, credentials, abi)?;
//!
//!     // Run one monitor and one transfer cycle
//!     agent.run(Some(1)).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod agent;
pub mod config;
pub mod error;
pub mod rpc;
pub mod signer;
pub mod types;

// Re-exports for convenience
pub use agent::Agent;
pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use signer::{Credential, CredentialSet};
pub use types::*;
