//! TayaSwap client configuration
//!
//! Addresses, endpoint and signer are read from the environment (a `.env` file
//! is loaded by `main`) and handed to the query and deploy code explicitly.

use alloy::primitives::Address;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// Environment variables
pub const RPC_URL_VAR: &str = "TAYA_RPC_URL";
pub const EXCHANGE_ADDRESS_VAR: &str = "TAYASWAP_ADDRESS";
pub const TOKEN_ADDRESS_VAR: &str = "TAYATOKEN_ADDRESS";
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
pub const ARTIFACT_PATH_VAR: &str = "TAYASWAP_ARTIFACT";

/// Local Hardhat/Anvil node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Hardhat output location of the compiled exchange contract
pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/contracts/TayaSwap.sol/TayaSwap.json";

// Decimals
pub const ETHER_DECIMALS: u8 = 18;
pub const TAYA_DECIMALS: u8 = 18;
pub const LP_DECIMALS: u8 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set (environment or .env file)")]
    Missing(&'static str),

    #[error("{var} is not a valid address: {value:?}")]
    InvalidAddress { var: &'static str, value: String },
}

/// Fixed addresses of the deployed exchange pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contracts {
    /// TayaSwap exchange contract (also the LP token)
    pub exchange: Address,
    /// TayaToken ERC20 traded against ether
    pub token: Address,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub exchange: Option<Address>,
    pub token: Option<Address>,
    pub private_key: Option<String>,
    pub artifact_path: PathBuf,
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let rpc_url = get(RPC_URL_VAR).unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let exchange = get(EXCHANGE_ADDRESS_VAR)
            .map(|v| parse_address(EXCHANGE_ADDRESS_VAR, &v))
            .transpose()?;
        let token = get(TOKEN_ADDRESS_VAR)
            .map(|v| parse_address(TOKEN_ADDRESS_VAR, &v))
            .transpose()?;
        let private_key = get(PRIVATE_KEY_VAR);
        let artifact_path = get(ARTIFACT_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_PATH));

        Ok(Self {
            rpc_url,
            exchange,
            token,
            private_key,
            artifact_path,
        })
    }

    /// Both pair addresses, required by every query command
    pub fn contracts(&self) -> Result<Contracts, ConfigError> {
        Ok(Contracts {
            exchange: self.exchange()?,
            token: self.token()?,
        })
    }

    /// Exchange address alone, enough for the pool's ether balance
    pub fn exchange(&self) -> Result<Address, ConfigError> {
        self.exchange.ok_or(ConfigError::Missing(EXCHANGE_ADDRESS_VAR))
    }

    /// Token address, the exchange constructor argument
    pub fn token(&self) -> Result<Address, ConfigError> {
        self.token.ok_or(ConfigError::Missing(TOKEN_ADDRESS_VAR))
    }

    pub fn private_key(&self) -> Result<&str, ConfigError> {
        self.private_key
            .as_deref()
            .ok_or(ConfigError::Missing(PRIVATE_KEY_VAR))
    }
}

fn parse_address(var: &'static str, value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value).map_err(|_| ConfigError::InvalidAddress {
        var,
        value: value.to_string(),
    })
}
