//! Trading fee records

use super::common::{Model, de};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn zero() -> String {
    "0".to_string()
}

fn trading() -> String {
    "TRADING".to_string()
}

/// One fee charged to the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    /// Fee record identifier
    #[serde(default, deserialize_with = "de::flex_string")]
    pub fee_id: String,
    /// Asset traded
    #[serde(default, deserialize_with = "de::flex_string")]
    pub asset_id: String,
    /// Trading symbol
    #[serde(default, deserialize_with = "de::flex_string")]
    pub symbol: String,
    /// Amount charged
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub fee_amount: String,
    /// Fee category, e.g. `TRADING` or `FUNDING`
    #[serde(default = "trading", deserialize_with = "de::flex_string")]
    pub fee_type: String,
    /// Order that incurred the fee
    #[serde(default, deserialize_with = "de::opt_flex_string")]
    pub order_id: Option<String>,
    /// When the fee was charged
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Model for FeeRecord {
    const ALIASES: &'static [(&'static str, &'static str)] = &[("fee_id", "id")];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::decode_page;
    use crate::types::Page;

    #[test]
    fn test_fee_page() {
        let page: Page<FeeRecord> = decode_page(serde_json::json!({
            "data": [
                {"id": 7, "asset_id": "BTCUSDT", "fee_amount": 0.12, "created_at": 1_700_000_000},
                {"fee_id": "8", "fee_type": "FUNDING", "order_id": 991}
            ],
            "total": 2
        }))
        .unwrap();

        assert_eq!(page.items[0].fee_id, "7");
        assert_eq!(page.items[0].fee_amount, "0.12");
        assert_eq!(page.items[0].fee_type, "TRADING");
        assert_eq!(page.items[1].order_id.as_deref(), Some("991"));
        assert_eq!(page.total, 2);
        assert!(!page.has_more);
    }
}
