use alloy::primitives::utils::format_units;
use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::config::{ETHER_DECIMALS, LP_DECIMALS, TAYA_DECIMALS};
use crate::query::{QueryError, Snapshot};

const UNAVAILABLE: &str = "unavailable";

/// Convert a raw integer amount to decimal units, falling back to the raw value
pub fn format_amount(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}

/// Print one balance line with raw and human readable values
pub fn print_amount(label: &str, amount: U256, decimals: u8, unit: &str) {
    println!("{}: {} {} ({} wei)", label, format_amount(amount, decimals), unit, amount);
}

fn amount_line(amount: &Result<U256, QueryError>, decimals: u8, unit: &str) -> String {
    match amount {
        Ok(value) => format!("{:>28} {}", format_amount(*value, decimals), unit),
        Err(_) => format!("{:>28}", UNAVAILABLE),
    }
}

/// Print a snapshot in a formatted way
pub fn print_snapshot(snapshot: &Snapshot) {
    println!();
    println!("══════════════════════════════════════════════════════════════");
    println!("  TAYASWAP ACCOUNT SUMMARY");
    println!("  Account: {}", snapshot.account);
    println!("══════════════════════════════════════════════════════════════");
    println!("  {:>16}: {}", "ETH", amount_line(&snapshot.ether, ETHER_DECIMALS, "ETH"));
    println!("  {:>16}: {}", "TAYA", amount_line(&snapshot.taya, TAYA_DECIMALS, "TAYA"));
    println!("  {:>16}: {}", "LP", amount_line(&snapshot.lp, LP_DECIMALS, "LP"));
    println!("──────────────────────────────────────────────────────────────");
    println!(
        "  {:>16}: {}",
        "Pool ETH",
        amount_line(&snapshot.exchange_ether, ETHER_DECIMALS, "ETH")
    );
    println!(
        "  {:>16}: {}",
        "Pool TAYA",
        amount_line(&snapshot.taya_reserve, TAYA_DECIMALS, "TAYA")
    );
    println!("══════════════════════════════════════════════════════════════");
    println!();
}

/// Machine readable snapshot; failed lookups carry their error text
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SnapshotView {
    pub account: Address,
    pub ether: FieldView,
    pub taya: FieldView,
    pub lp: FieldView,
    pub exchange_ether: FieldView,
    pub taya_reserve: FieldView,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldView {
    Value { raw: String, formatted: String },
    Error { error: String },
}

impl FieldView {
    fn new(amount: &Result<U256, QueryError>, decimals: u8) -> Self {
        match amount {
            Ok(value) => FieldView::Value {
                raw: value.to_string(),
                formatted: format_amount(*value, decimals),
            },
            Err(e) => FieldView::Error { error: e.to_string() },
        }
    }
}

impl From<&Snapshot> for SnapshotView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            account: snapshot.account,
            ether: FieldView::new(&snapshot.ether, ETHER_DECIMALS),
            taya: FieldView::new(&snapshot.taya, TAYA_DECIMALS),
            lp: FieldView::new(&snapshot.lp, LP_DECIMALS),
            exchange_ether: FieldView::new(&snapshot.exchange_ether, ETHER_DECIMALS),
            taya_reserve: FieldView::new(&snapshot.taya_reserve, TAYA_DECIMALS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use alloy::transports::TransportErrorKind;

    fn failed(operation: &'static str) -> Result<U256, QueryError> {
        Err(QueryError::Rpc {
            operation,
            source: TransportErrorKind::custom_str("timed out"),
        })
    }

    #[test]
    fn test_format_amount() {
        let one_and_half = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_amount(one_and_half, 18), "1.500000000000000000");
        assert_eq!(format_amount(U256::ZERO, 18), "0.000000000000000000");
    }

    #[test]
    fn test_snapshot_view_marks_failures() {
        let snapshot = Snapshot {
            account: address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
            ether: Ok(U256::from(10u64).pow(U256::from(18u64))),
            exchange_ether: Ok(U256::ZERO),
            taya: failed("token_balance"),
            lp: Ok(U256::from(3u64)),
            taya_reserve: failed("token_reserve"),
        };

        let view = SnapshotView::from(&snapshot);
        assert_eq!(
            view.ether,
            FieldView::Value {
                raw: "1000000000000000000".to_string(),
                formatted: "1.000000000000000000".to_string(),
            }
        );
        assert!(matches!(&view.taya, FieldView::Error { error } if error.starts_with("token_balance")));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["lp"]["raw"], "3");
        assert!(json["taya_reserve"]["error"].as_str().unwrap().contains("timed out"));
    }
}
