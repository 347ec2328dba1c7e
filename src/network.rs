use alloy::providers::Provider;
use alloy::transports::TransportResult;
use std::time::Instant;

/// Chain ids of the networks the exchange is usually deployed to
pub const MAINNET_CHAIN_ID: u64 = 1;
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
pub const HOLESKY_CHAIN_ID: u64 = 17_000;
pub const HARDHAT_CHAIN_ID: u64 = 31_337;

/// Reachability of the configured RPC endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStatus {
    pub chain_id: u64,
    pub block_number: u64,
    pub rpc_latency_ms: u64,
}

impl NetworkStatus {
    /// Measures the block number round trip, then reads the chain id
    pub async fn probe<P: Provider>(provider: &P) -> TransportResult<Self> {
        let start = Instant::now();
        let block_number = provider.get_block_number().await?;
        let rpc_latency_ms = start.elapsed().as_millis() as u64;

        let chain_id = provider.get_chain_id().await?;

        Ok(Self {
            chain_id,
            block_number,
            rpc_latency_ms,
        })
    }

    pub fn network_name(&self) -> &'static str {
        chain_name(self.chain_id)
    }

    /// Print status to console
    pub fn print_status(&self) {
        println!("Network: {} (chain id {})", self.network_name(), self.chain_id);
        println!("  Block Number: {}", self.block_number);
        println!("  RPC Latency: {}ms", self.rpc_latency_ms);
    }
}

pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        MAINNET_CHAIN_ID => "mainnet",
        SEPOLIA_CHAIN_ID => "sepolia",
        HOLESKY_CHAIN_ID => "holesky",
        HARDHAT_CHAIN_ID => "hardhat",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{rpc_provider, RpcReply};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_probe_reads_block_and_chain() {
        let (_server, provider) = rpc_provider(|method: &str, _: &Value| match method {
            "eth_blockNumber" => RpcReply::ok(json!("0x2a")),
            "eth_chainId" => RpcReply::ok(json!("0x7a69")),
            _ => RpcReply::err(-32601, "method not found"),
        })
        .await;

        let status = NetworkStatus::probe(&provider).await.unwrap();
        assert_eq!(status.block_number, 42);
        assert_eq!(status.chain_id, HARDHAT_CHAIN_ID);
        assert_eq!(status.network_name(), "hardhat");
    }

    #[tokio::test]
    async fn test_probe_propagates_rpc_errors() {
        let (_server, provider) =
            rpc_provider(|_: &str, _: &Value| RpcReply::err(-32000, "node offline")).await;

        assert!(NetworkStatus::probe(&provider).await.is_err());
    }

    #[test]
    fn test_chain_names() {
        assert_eq!(chain_name(1), "mainnet");
        assert_eq!(chain_name(11_155_111), "sepolia");
        assert_eq!(chain_name(424242), "unknown");
    }
}
