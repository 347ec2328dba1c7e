//! Exchange contract deployment
//!
//! The creation transaction carries the compiled TayaSwap bytecode followed by
//! the ABI-encoded token address, the contract's only constructor argument.

use alloy::json_abi::ContractObject;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{PendingTransactionError, Provider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolValue;
use alloy::transports::TransportError;
use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const CONTRACT_NAME: &str = "TayaSwap";

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to read artifact {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact has no creation bytecode")]
    MissingBytecode,

    #[error("constructor takes {0} arguments, expected a single token address")]
    ConstructorMismatch(usize),

    #[error("failed to send creation transaction: {0}")]
    Send(#[from] TransportError),

    #[error("failed waiting for creation transaction: {0}")]
    Pending(#[from] PendingTransactionError),

    #[error("creation transaction {0} reverted")]
    Reverted(TxHash),

    #[error("receipt for {0} has no contract address")]
    NoContractAddress(TxHash),
}

/// Outcome of a confirmed deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Sends creation code to the network and waits for it to be mined
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(&self, init_code: Bytes) -> Result<Deployment, DeployError>;
}

/// Deployer backed by a signing provider
#[derive(Debug)]
pub struct ProviderDeployer<P> {
    provider: P,
}

impl<P: Provider> ProviderDeployer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider> Deployer for ProviderDeployer<P> {
    async fn deploy(&self, init_code: Bytes) -> Result<Deployment, DeployError> {
        let tx = TransactionRequest::default().with_deploy_code(init_code);

        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        info!("Creation tx submitted: {:?}", tx_hash);

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(DeployError::Reverted(tx_hash));
        }
        let address = receipt
            .contract_address
            .ok_or(DeployError::NoContractAddress(tx_hash))?;
        info!("Creation tx confirmed: {:?}", tx_hash);

        Ok(Deployment {
            address,
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

/// Load a Hardhat or Foundry artifact
pub fn load_artifact(path: &Path) -> Result<ContractObject, DeployError> {
    let content = std::fs::read_to_string(path).map_err(|source| DeployError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DeployError::ArtifactParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Creation bytecode followed by the encoded constructor argument
pub fn init_code(artifact: &ContractObject, token: Address) -> Result<Bytes, DeployError> {
    let bytecode = artifact
        .bytecode
        .as_ref()
        .filter(|code| !code.is_empty())
        .ok_or(DeployError::MissingBytecode)?;

    if let Some(constructor) = artifact.abi.as_ref().and_then(|abi| abi.constructor.as_ref()) {
        if constructor.inputs.len() != 1 {
            return Err(DeployError::ConstructorMismatch(constructor.inputs.len()));
        }
    }

    let mut code = bytecode.to_vec();
    code.extend_from_slice(&token.abi_encode());
    Ok(code.into())
}

/// Deploy the exchange contract bound to `token`
pub async fn deploy_exchange<D: Deployer + ?Sized>(
    deployer: &D,
    artifact: &ContractObject,
    token: Address,
) -> Result<Deployment, DeployError> {
    let code = init_code(artifact, token)?;
    info!(
        "Deploying {} ({} bytes of init code) with token {}",
        CONTRACT_NAME,
        code.len(),
        token
    );
    deployer.deploy(code).await
}

pub fn print_deployment<W: Write>(out: &mut W, deployment: &Deployment) -> std::io::Result<()> {
    writeln!(out, "Exchange Contract Address: {}", deployment.address)
}
