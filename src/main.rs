//! Deploy a compiled contract to an EVM chain from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use alloy::primitives::Bytes;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evm_deployer::artifact::CompiledArtifact;
use evm_deployer::chain::{ChainClient, DeployError};
use evm_deployer::config::load_config;
use evm_deployer::deploy::{DeploySettings, DeploymentOrchestrator};
use evm_deployer::wallet::SigningWallet;

#[derive(Parser)]
#[command(name = "evm-deployer")]
#[command(about = "Deploy a compiled contract to an EVM-compatible chain", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "deployer.toml")]
    config: PathBuf,

    /// Path to the compiled artifact (JSON with bytecode and ABI).
    #[arg(short, long)]
    artifact: PathBuf,

    /// ABI-encoded constructor arguments, hex.
    #[arg(long)]
    constructor_args: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evm_deployer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Deployment aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    tracing::info!(
        rpc_url = %config.rpc.rpc_url,
        chain_id = config.rpc.chain_id,
        confirmation_timeout_secs = config.confirmation.timeout_secs,
        "Configuration loaded"
    );

    let artifact = CompiledArtifact::load(&cli.artifact)?;
    if let Some(name) = &artifact.contract_name {
        tracing::info!(contract = %name, "Artifact loaded");
    }

    let constructor_args = cli
        .constructor_args
        .as_deref()
        .map(parse_hex_args)
        .transpose()?;
    let data = artifact.deploy_data(constructor_args.as_ref())?;

    let wallet = SigningWallet::from_env()?;
    let client = ChainClient::new(config.rpc.clone()).await?;

    if !client.is_connected().await {
        tracing::warn!("Node endpoint is not responding; the attempt will likely fail");
    }

    let orchestrator =
        DeploymentOrchestrator::new(client, wallet, DeploySettings::from_config(&config));
    let outcome = orchestrator.deploy(data).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn parse_hex_args(hex: &str) -> Result<Bytes, DeployError> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    alloy::primitives::hex::decode(hex)
        .map(Bytes::from)
        .map_err(|e| DeployError::Config(format!("constructor args are not valid hex: {}", e)))
}
