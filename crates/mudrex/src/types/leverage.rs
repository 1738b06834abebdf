//! Leverage and margin mode

use super::common::{Model, de, wire_enum};
use serde::{Deserialize, Serialize};

fn one() -> String {
    "1".to_string()
}

/// Margin mode for a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarginType {
    /// Margin is isolated per position
    #[default]
    Isolated,
}

wire_enum!(MarginType, "margin type", {
    Isolated => "ISOLATED",
});

/// Leverage setting for an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leverage {
    /// Asset the setting applies to
    #[serde(default, deserialize_with = "de::flex_string")]
    pub asset_id: String,
    /// Leverage multiplier
    #[serde(default = "one", deserialize_with = "de::flex_string")]
    pub leverage: String,
    /// Margin mode
    #[serde(default)]
    pub margin_type: MarginType,
}

impl Model for Leverage {}
