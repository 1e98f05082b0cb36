//! Monitor once example
//!
//! This example runs a single balance monitor cycle and prints every wallet's
//! balance, without sending anything.

use token_relay_agent::{
    rpc::contract::default_abi, signer::format_base_units, Agent, AgentConfig, CredentialSet,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("🚀 Starting relay monitor example");

    // Hardhat/Anvil development keys - DO NOT USE IN PRODUCTION
    let credentials = CredentialSet::from_keys([
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    ])?;

    let config = AgentConfig::default();
    let decimals = config.token_decimals;
    let agent = Agent::from_config(config, credentials, default_abi()?)?;
    info!("✅ Relay agent initialized successfully");

    // One monitor cycle; the transfer loop is never started
    match agent.monitor().run_cycle().await {
        Ok(report) => {
            info!("✅ Read {} wallets via {}", report.balances.len(), report.endpoint);
            for snapshot in &report.balances {
                match snapshot.balance {
                    Some(balance) => info!(
                        "  - {:?}: {}",
                        snapshot.address,
                        format_base_units(balance, decimals)
                    ),
                    None => info!("  - {:?}: unknown", snapshot.address),
                }
            }
        }
        Err(e) => error!("❌ Failed to read balances: {}", e),
    }

    info!("✨ Monitor cycle done!");
    Ok(())
}
