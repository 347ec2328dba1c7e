use alloy::network::EthereumWallet;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod deploy;
mod display;
mod network;
mod query;

#[cfg(test)]
mod test_utils;

use config::{Config, ETHER_DECIMALS, LP_DECIMALS, TAYA_DECIMALS};
use deploy::{deploy_exchange, load_artifact, print_deployment, ProviderDeployer};
use display::{print_amount, print_snapshot, SnapshotView};
use network::NetworkStatus;
use query::{ether_balance, EtherHolder, TayaQuery};

#[derive(Parser)]
#[command(name = "tayaswap")]
#[command(about = "TayaSwap exchange toolkit", long_about = None)]
struct Cli {
    /// JSON-RPC endpoint (overrides TAYA_RPC_URL)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ether balance of an account, or of the exchange with --contract
    Balance {
        #[arg(required_unless_present = "contract")]
        address: Option<Address>,

        /// Read the exchange contract's balance instead
        #[arg(long, default_value = "false")]
        contract: bool,
    },

    /// TayaToken balance of an account
    TokenBalance { address: Address },

    /// Exchange LP token balance of an account
    LpBalance { address: Address },

    /// TayaToken reserve held by the exchange
    Reserve,

    /// Every balance for an account plus the pool reserves
    Summary {
        address: Address,

        /// Print JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Check the RPC endpoint
    Status,

    /// Deploy the TayaSwap exchange contract
    Deploy {
        /// Compiled artifact (overrides TAYASWAP_ARTIFACT)
        #[arg(long)]
        artifact: Option<PathBuf>,

        /// Print the deployment as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

fn rpc_url(config: &Config) -> Result<reqwest::Url> {
    config
        .rpc_url
        .parse()
        .wrap_err_with(|| format!("invalid RPC url {}", config.rpc_url))
}

fn connect(config: &Config) -> Result<impl Provider> {
    Ok(ProviderBuilder::new().connect_http(rpc_url(config)?))
}

/// Only the exchange lookup needs a configured address
async fn run_balance(config: &Config, address: Option<Address>, contract: bool) -> Result<U256> {
    let provider = connect(config)?;

    let holder = match address {
        Some(address) => EtherHolder::new(address, contract),
        None => EtherHolder::Exchange,
    };
    let target = match holder {
        EtherHolder::Account(address) => address,
        EtherHolder::Exchange => config.exchange()?,
    };
    let balance = ether_balance(&provider, target).await?;
    print_amount("ETH", balance, ETHER_DECIMALS, "ETH");

    Ok(balance)
}

async fn run_token_balance(config: &Config, address: Address) -> Result<()> {
    let provider = connect(config)?;
    let query = TayaQuery::new(&provider, config.contracts()?);

    let balance = query.token_balance(address).await?;
    print_amount("TAYA", balance, TAYA_DECIMALS, "TAYA");

    Ok(())
}

async fn run_lp_balance(config: &Config, address: Address) -> Result<()> {
    let provider = connect(config)?;
    let query = TayaQuery::new(&provider, config.contracts()?);

    let balance = query.lp_balance(address).await?;
    print_amount("LP", balance, LP_DECIMALS, "LP");

    Ok(())
}

async fn run_reserve(config: &Config) -> Result<()> {
    let provider = connect(config)?;
    let query = TayaQuery::new(&provider, config.contracts()?);

    let reserve = query.token_reserve().await?;
    print_amount("TAYA reserve", reserve, TAYA_DECIMALS, "TAYA");

    Ok(())
}

/// Failed lookups are shown as unavailable, the command itself still succeeds
async fn run_summary(config: &Config, address: Address, json: bool) -> Result<()> {
    let provider = connect(config)?;
    let query = TayaQuery::new(&provider, config.contracts()?);

    let snapshot = query.snapshot(address).await;
    if json {
        let view = SnapshotView::from(&snapshot);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_snapshot(&snapshot);
    }

    Ok(())
}

async fn run_status(config: &Config) -> Result<()> {
    let provider = connect(config)?;

    println!("Checking {}...", config.rpc_url);
    let status = NetworkStatus::probe(&provider).await?;
    status.print_status();

    Ok(())
}

async fn run_deploy(config: &Config, artifact: Option<PathBuf>, json: bool) -> Result<()> {
    let token = config.token()?;
    let artifact_path = artifact.unwrap_or_else(|| config.artifact_path.clone());
    let artifact = load_artifact(&artifact_path)?;

    let signer = PrivateKeySigner::from_str(config.private_key()?)?;
    let deployer_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(rpc_url(config)?);

    match NetworkStatus::probe(&provider).await {
        Ok(status) => info!(
            "Deploying from {} on {} (chain id {}, block {})",
            deployer_address,
            status.network_name(),
            status.chain_id,
            status.block_number
        ),
        Err(e) => warn!("Network probe failed: {}", e),
    }

    let deployer = ProviderDeployer::new(provider);
    let deployment = deploy_exchange(&deployer, &artifact, token).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&deployment)?);
    } else {
        print_deployment(&mut std::io::stdout().lock(), &deployment)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.rpc_url {
        config.rpc_url = url;
    }

    match cli.command {
        Commands::Status => run_status(&config).await,
        Commands::Deploy { artifact, json } => run_deploy(&config, artifact, json).await,
        Commands::Balance { address, contract } => {
            run_balance(&config, address, contract).await.map(|_| ())
        }
        Commands::TokenBalance { address } => run_token_balance(&config, address).await,
        Commands::LpBalance { address } => run_lp_balance(&config, address).await,
        Commands::Reserve => run_reserve(&config).await,
        Commands::Summary { address, json } => run_summary(&config, address, json).await,
    }
}
