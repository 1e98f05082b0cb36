//! Relay once example
//!
//! This example loads keys and config from disk and runs exactly one cycle of
//! both loops, the same as `token-relay-agent --once`.

use token_relay_agent::{rpc::load_abi, Agent, AgentConfig, CredentialSet};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("🚀 Starting relay example");

    let config = AgentConfig::load("agent.json")?;
    let credentials = CredentialSet::load("privateKeys.json")?;
    let abi = load_abi("abi.json")?;
    info!("🔑 Loaded {} wallets", credentials.len());

    let agent = Agent::from_config(config, credentials, abi)?;
    agent.run(Some(1)).await?;

    info!("✨ Relay cycle done!");
    Ok(())
}
