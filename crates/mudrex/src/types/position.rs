//! Positions and their risk orders

use super::OrderType;
use super::common::{Model, de, wire_enum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn one() -> String {
    "1".to_string()
}

fn zero() -> String {
    "0".to_string()
}

/// Whether a position is still open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    /// Position is open
    #[default]
    Open,
    /// Position has been closed
    Closed,
}

wire_enum!(PositionStatus, "position status", {
    Open => "OPEN",
    Closed => "CLOSED",
});

/// An open or historical futures position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Position identifier
    #[serde(default, deserialize_with = "de::flex_string")]
    pub position_id: String,
    /// Asset the position is in
    #[serde(default, deserialize_with = "de::flex_string")]
    pub asset_id: String,
    /// Trading symbol
    #[serde(default, deserialize_with = "de::flex_string")]
    pub symbol: String,
    /// Long or short
    #[serde(default)]
    pub side: OrderType,
    /// Position size
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub quantity: String,
    /// Average entry price
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub entry_price: String,
    /// Current mark price
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub mark_price: String,
    /// Leverage multiplier
    #[serde(default = "one", deserialize_with = "de::flex_string")]
    pub leverage: String,
    /// Margin allocated
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub margin: String,
    /// Unrealized profit and loss
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub unrealized_pnl: String,
    /// Realized profit and loss
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub realized_pnl: String,
    /// Liquidation price
    #[serde(default, deserialize_with = "de::opt_flex_string")]
    pub liquidation_price: Option<String>,
    /// Attached stop-loss price
    #[serde(default, deserialize_with = "de::opt_flex_string")]
    pub stoploss_price: Option<String>,
    /// Attached take-profit price
    #[serde(default, deserialize_with = "de::opt_flex_string")]
    pub takeprofit_price: Option<String>,
    /// Open or closed
    #[serde(default)]
    pub status: PositionStatus,
    /// Open time
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Model for Position {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("position_id", "id"), ("side", "order_type")];
}

impl Position {
    /// Unrealized PnL as a percentage of margin; `0.0` when margin is zero
    /// or either value is not a number.
    pub fn pnl_percentage(&self) -> f64 {
        let margin = self.margin.trim().parse::<f64>().unwrap_or(0.0);
        let pnl = self.unrealized_pnl.trim().parse::<f64>().unwrap_or(0.0);
        if margin > 0.0 { pnl / margin * 100.0 } else { 0.0 }
    }
}

/// Stop-loss / take-profit prices for a position.
///
/// Only prices that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskOrder {
    /// Position the risk order belongs to
    #[serde(skip)]
    pub position_id: String,
    /// Stop-loss trigger price
    #[serde(skip_serializing_if = "is_blank")]
    pub stoploss_price: Option<String>,
    /// Take-profit trigger price
    #[serde(skip_serializing_if = "is_blank")]
    pub takeprofit_price: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

impl RiskOrder {
    /// Risk order for `position_id` with no prices set.
    pub fn new(position_id: impl Into<String>) -> Self {
        Self {
            position_id: position_id.into(),
            ..Default::default()
        }
    }

    /// Set the stop-loss price.
    pub fn stoploss(mut self, price: impl Into<String>) -> Self {
        self.stoploss_price = Some(price.into());
        self
    }

    /// Set the take-profit price.
    pub fn takeprofit(mut self, price: impl Into<String>) -> Self {
        self.takeprofit_price = Some(price.into());
        self
    }

    /// Whether neither price is set.
    pub fn is_empty(&self) -> bool {
        is_blank(&self.stoploss_price) && is_blank(&self.takeprofit_price)
    }
}
