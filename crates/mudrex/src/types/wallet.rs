//! Wallet balances and transfers

use super::common::{Model, de, wire_enum};
use serde::{Deserialize, Serialize};

fn zero() -> String {
    "0".to_string()
}

fn usdt() -> String {
    "USDT".to_string()
}

/// Which wallet funds move between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletType {
    /// Spot wallet
    #[default]
    Spot,
    /// Futures wallet
    Futures,
}

wire_enum!(WalletType, "wallet type", {
    Spot => "SPOT",
    Futures => "FUTURES",
});

/// Spot wallet balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Total balance
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub total: String,
    /// Balance available for trading or transfer
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub available: String,
    /// Reward balance
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub rewards: String,
    /// Withdrawable balance
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub withdrawable: String,
    /// Settlement currency
    #[serde(default = "usdt", deserialize_with = "de::flex_string")]
    pub currency: String,
}

impl Model for WalletBalance {}

/// Futures wallet balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesBalance {
    /// Wallet balance
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub balance: String,
    /// Amount that can be moved back to spot
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub available_transfer: String,
    /// Unrealized profit and loss across open positions
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub unrealized_pnl: String,
    /// Margin locked in positions and orders
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub margin_used: String,
    /// Settlement currency
    #[serde(default = "usdt", deserialize_with = "de::flex_string")]
    pub currency: String,
}

impl Model for FuturesBalance {}

/// Outcome of a spot/futures transfer.
///
/// Wallets and amount are filled in from the request; the server only
/// contributes the transaction id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResult {
    /// Whether the transfer was accepted
    pub success: bool,
    /// Source wallet
    pub from_wallet: WalletType,
    /// Destination wallet
    pub to_wallet: WalletType,
    /// Amount moved
    pub amount: String,
    /// Server transaction id, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TransferReceipt {
    #[serde(default, deserialize_with = "de::opt_flex_string")]
    pub(crate) transaction_id: Option<String>,
}

impl Model for TransferReceipt {
    const ALIASES: &'static [(&'static str, &'static str)] = &[("transaction_id", "id")];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::decode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_wallet_balance_defaults_and_coercion() {
        let balance: WalletBalance = decode(json!({"total": 120.5, "available": "100"})).unwrap();

        assert_eq!(balance.total, "120.5");
        assert_eq!(balance.available, "100");
        assert_eq!(balance.rewards, "0");
        assert_eq!(balance.withdrawable, "0");
        assert_eq!(balance.currency, "USDT");
    }

    #[test]
    fn test_futures_balance() {
        let balance: FuturesBalance = decode(json!({
            "balance": "50",
            "available_transfer": 25,
            "unrealized_pnl": "-1.5"
        }))
        .unwrap();

        assert_eq!(balance.available_transfer, "25");
        assert_eq!(balance.unrealized_pnl, "-1.5");
        assert_eq!(balance.margin_used, "0");
    }

    #[test]
    fn test_wallet_type_parsing() {
        assert_eq!("spot".parse::<WalletType>().unwrap(), WalletType::Spot);
        assert_eq!("FUTURES".parse::<WalletType>().unwrap(), WalletType::Futures);
        assert!("margin".parse::<WalletType>().is_err());
        assert_eq!(serde_json::to_value(WalletType::Futures).unwrap(), json!("FUTURES"));
    }

    #[test]
    fn test_transfer_receipt_accepts_id() {
        let receipt: TransferReceipt = decode(json!({"id": 991})).unwrap();
        assert_eq!(receipt.transaction_id.as_deref(), Some("991"));
    }
}
