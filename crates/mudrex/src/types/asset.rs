//! Tradable futures contracts

use super::common::{Model, de};
use serde::{Deserialize, Serialize};

fn zero() -> String {
    "0".to_string()
}

fn one() -> String {
    "1".to_string()
}

fn hundred() -> String {
    "100".to_string()
}

fn usdt() -> String {
    "USDT".to_string()
}

fn active() -> bool {
    true
}

/// A futures contract and its trading limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identifier used in endpoint paths
    #[serde(default, deserialize_with = "de::flex_string")]
    pub asset_id: String,
    /// Trading symbol, e.g. `BTCUSDT`
    #[serde(default, deserialize_with = "de::flex_string")]
    pub symbol: String,
    /// Base currency
    #[serde(default, deserialize_with = "de::flex_string")]
    pub base_currency: String,
    /// Quote currency
    #[serde(default = "usdt", deserialize_with = "de::flex_string")]
    pub quote_currency: String,
    /// Minimum order quantity
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub min_quantity: String,
    /// Maximum order quantity
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub max_quantity: String,
    /// Quantity increment
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub quantity_step: String,
    /// Lowest allowed leverage
    #[serde(default = "one", deserialize_with = "de::flex_string")]
    pub min_leverage: String,
    /// Highest allowed leverage
    #[serde(default = "hundred", deserialize_with = "de::flex_string")]
    pub max_leverage: String,
    /// Maker fee rate
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub maker_fee: String,
    /// Taker fee rate
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub taker_fee: String,
    /// Whether the contract is currently tradable
    #[serde(default = "active", deserialize_with = "de::flex_bool")]
    pub is_active: bool,
}

impl Model for Asset {
    const ALIASES: &'static [(&'static str, &'static str)] = &[("asset_id", "id")];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::{decode, decode_list};
    use serde_json::json;

    #[test]
    fn test_asset_defaults() {
        let asset: Asset = decode(json!({"id": "BTCUSDT", "symbol": "BTCUSDT"})).unwrap();

        assert_eq!(asset.asset_id, "BTCUSDT");
        assert_eq!(asset.quote_currency, "USDT");
        assert_eq!(asset.min_leverage, "1");
        assert_eq!(asset.max_leverage, "100");
        assert!(asset.is_active);
    }

    #[test]
    fn test_asset_list_coerces_numbers() {
        let assets: Vec<Asset> = decode_list(json!({"data": [{
            "asset_id": "ETHUSDT",
            "symbol": "ETHUSDT",
            "min_quantity": 0.01,
            "max_leverage": 50,
            "is_active": "false"
        }]}))
        .unwrap();

        assert_eq!(assets[0].min_quantity, "0.01");
        assert_eq!(assets[0].max_leverage, "50");
        assert!(!assets[0].is_active);
    }
}
