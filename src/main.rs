use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use token_relay_agent::{
    rpc::{contract::default_abi, load_abi},
    Agent, AgentConfig, CredentialSet,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about = "ERC-20 balance monitor and transfer relay")]
struct Args {
    /// Path to a JSON config file; built-in defaults when omitted
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Path to the JSON array of private keys
    #[clap(short, long, default_value = "privateKeys.json")]
    keys: PathBuf,

    /// Path to the token contract ABI; built-in ERC-20 ABI when omitted
    #[clap(short, long)]
    abi: Option<PathBuf>,

    /// Run one cycle of each loop and exit
    #[clap(long)]
    once: bool,
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AgentConfig::default(),
    };

    let credentials = CredentialSet::load(&args.keys)
        .with_context(|| format!("loading keys from {}", args.keys.display()))?;
    info!("🔑 Loaded {} wallets", credentials.len());

    let abi = match &args.abi {
        Some(path) => {
            load_abi(path).with_context(|| format!("loading ABI from {}", path.display()))?
        }
        None => default_abi()?,
    };

    let agent = Agent::from_config(config, credentials, abi)?;
    agent.run(args.once.then_some(1)).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!("🛑 Fatal: {:#}", e);
        std::process::exit(1);
    }
}
