//! Read-only balance and reserve lookups against the deployed exchange pair

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol;
use alloy::sol_types::SolCall;
use alloy::transports::TransportError;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::Contracts;

sol! {
    #[derive(Debug)]
    interface ITayaToken {
        function balanceOf(address account) external view returns (uint256);
    }

    #[derive(Debug)]
    interface ITayaSwap {
        function balanceOf(address account) external view returns (uint256);
        function getTAYAReservebalance() external view returns (uint256);
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{operation}: rpc call failed: {source}")]
    Rpc {
        operation: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("{operation}: could not decode return data: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: alloy::sol_types::Error,
    },
}

impl QueryError {
    pub fn operation(&self) -> &'static str {
        match self {
            QueryError::Rpc { operation, .. } | QueryError::Decode { operation, .. } => operation,
        }
    }
}

/// Whose native balance to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherHolder {
    Account(Address),
    /// The configured exchange contract, whatever address was supplied
    Exchange,
}

impl EtherHolder {
    pub fn new(address: Address, contract: bool) -> Self {
        if contract {
            EtherHolder::Exchange
        } else {
            EtherHolder::Account(address)
        }
    }
}

/// Every lookup for one account, each with its own outcome
#[derive(Debug)]
pub struct Snapshot {
    pub account: Address,
    pub ether: Result<U256, QueryError>,
    pub exchange_ether: Result<U256, QueryError>,
    pub taya: Result<U256, QueryError>,
    pub lp: Result<U256, QueryError>,
    pub taya_reserve: Result<U256, QueryError>,
}

/// Query handle over a caller-owned provider
#[derive(Debug)]
pub struct TayaQuery<'a, P> {
    provider: &'a P,
    contracts: Contracts,
}

impl<'a, P: Provider> TayaQuery<'a, P> {
    pub fn new(provider: &'a P, contracts: Contracts) -> Self {
        Self { provider, contracts }
    }

    /// Native ether balance of an account or of the exchange contract
    pub async fn ether_balance(&self, holder: EtherHolder) -> Result<U256, QueryError> {
        let target = match holder {
            EtherHolder::Account(address) => address,
            EtherHolder::Exchange => self.contracts.exchange,
        };
        ether_balance(self.provider, target).await
    }

    /// TayaToken held by `account`
    pub async fn token_balance(&self, account: Address) -> Result<U256, QueryError> {
        self.call(
            "token_balance",
            self.contracts.token,
            ITayaToken::balanceOfCall { account },
        )
        .await
    }

    /// Exchange LP tokens held by `account`
    pub async fn lp_balance(&self, account: Address) -> Result<U256, QueryError> {
        self.call(
            "lp_balance",
            self.contracts.exchange,
            ITayaSwap::balanceOfCall { account },
        )
        .await
    }

    /// TayaToken reserve held by the exchange
    pub async fn token_reserve(&self) -> Result<U256, QueryError> {
        self.call(
            "token_reserve",
            self.contracts.exchange,
            ITayaSwap::getTAYAReservebalanceCall {},
        )
        .await
    }

    /// Run every lookup for `account` concurrently
    pub async fn snapshot(&self, account: Address) -> Snapshot {
        let (ether, exchange_ether, taya, lp, taya_reserve) = futures::join!(
            self.ether_balance(EtherHolder::Account(account)),
            self.ether_balance(EtherHolder::Exchange),
            self.token_balance(account),
            self.lp_balance(account),
            self.token_reserve(),
        );

        for outcome in [&ether, &exchange_ether, &taya, &lp, &taya_reserve] {
            if let Err(e) = outcome {
                error!(operation = e.operation(), "{}", e);
            }
        }

        Snapshot {
            account,
            ether,
            exchange_ether,
            taya,
            lp,
            taya_reserve,
        }
    }

    async fn call<C: SolCall>(
        &self,
        operation: &'static str,
        to: Address,
        call: C,
    ) -> Result<C::Return, QueryError> {
        debug!("eth_call {} -> {}", operation, to);

        let tx = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(Bytes::from(call.abi_encode())));

        let result = self
            .provider
            .call(tx)
            .await
            .map_err(|source| QueryError::Rpc { operation, source })
            .inspect_err(|e| debug!(operation, "{}", e))?;

        C::abi_decode_returns(&result)
            .map_err(|source| QueryError::Decode { operation, source })
            .inspect_err(|e| debug!(operation, "{}", e))
    }
}

/// Native ether balance of any address; needs no pair configuration
pub async fn ether_balance<P: Provider>(provider: &P, address: Address) -> Result<U256, QueryError> {
    const OPERATION: &str = "ether_balance";

    debug!("eth_getBalance {}", address);
    provider
        .get_balance(address)
        .await
        .map_err(|source| QueryError::Rpc {
            operation: OPERATION,
            source,
        })
        .inspect_err(|e| debug!(operation = OPERATION, "{}", e))
}
