//! Orders and order requests

use super::common::{Model, de, wire_enum};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize, Serializer};

fn one() -> String {
    "1".to_string()
}

fn zero() -> String {
    "0".to_string()
}

/// Direction of an order or position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Buy / go long
    #[default]
    Long,
    /// Sell / go short
    Short,
}

wire_enum!(OrderType, "order type", {
    Long => "LONG",
    Short => "SHORT",
});

/// How an order executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    /// Fill immediately at the market price
    #[default]
    Market,
    /// Rest on the book at `order_price`
    Limit,
}

wire_enum!(TriggerType, "trigger type", {
    Market => "MARKET",
    Limit => "LIMIT",
});

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Accepted, nothing filled yet
    #[default]
    Open,
    /// Completely filled
    Filled,
    /// Partly filled, remainder still open
    PartiallyFilled,
    /// Cancelled before completion
    Cancelled,
    /// Expired before completion
    Expired,
}

wire_enum!(OrderStatus, "order status", {
    Open => "OPEN",
    Filled => "FILLED",
    PartiallyFilled => "PARTIALLY_FILLED",
    Cancelled => "CANCELLED",
    Expired => "EXPIRED",
});

impl OrderStatus {
    /// Whether the order can still fill.
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Open | OrderStatus::PartiallyFilled)
    }
}

/// Parameters for placing an order.
///
/// # Example
///
/// ```rust
/// use mudrex::{OrderRequest, OrderType, TriggerType};
///
/// let request = OrderRequest::builder()
///     .quantity("0.01")
///     .order_type(OrderType::Short)
///     .trigger_type(TriggerType::Limit)
///     .order_price("65000")
///     .leverage("10")
///     .stoploss_price("67000")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.takeprofit_price, None);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct OrderRequest {
    /// Contract quantity
    pub quantity: String,

    /// Long or short
    pub order_type: OrderType,

    /// Market or limit; defaults to market
    #[builder(default)]
    pub trigger_type: TriggerType,

    /// Leverage multiplier; defaults to `"1"`
    #[builder(default = "one()")]
    pub leverage: String,

    /// Limit price, required for limit orders
    #[builder(default, setter(into, strip_option))]
    pub order_price: Option<String>,

    /// Attach a stop-loss at this price
    #[builder(default, setter(into, strip_option))]
    pub stoploss_price: Option<String>,

    /// Attach a take-profit at this price
    #[builder(default, setter(into, strip_option))]
    pub takeprofit_price: Option<String>,

    /// Only reduce an existing position
    #[builder(default)]
    pub reduce_only: bool,
}

impl OrderRequest {
    /// Create a builder for constructing an order request.
    pub fn builder() -> OrderRequestBuilder {
        OrderRequestBuilder::default()
    }

    /// A market order.
    pub fn market(
        order_type: OrderType,
        quantity: impl Into<String>,
        leverage: impl Into<String>,
    ) -> Self {
        Self {
            quantity: quantity.into(),
            order_type,
            trigger_type: TriggerType::Market,
            leverage: leverage.into(),
            order_price: None,
            stoploss_price: None,
            takeprofit_price: None,
            reduce_only: false,
        }
    }

    /// A limit order at `price`.
    pub fn limit(
        order_type: OrderType,
        quantity: impl Into<String>,
        price: impl Into<String>,
        leverage: impl Into<String>,
    ) -> Self {
        Self {
            trigger_type: TriggerType::Limit,
            order_price: Some(price.into()),
            ..Self::market(order_type, quantity, leverage)
        }
    }

    /// Attach a stop-loss.
    pub fn with_stoploss(mut self, price: impl Into<String>) -> Self {
        self.stoploss_price = Some(price.into());
        self
    }

    /// Attach a take-profit.
    pub fn with_takeprofit(mut self, price: impl Into<String>) -> Self {
        self.takeprofit_price = Some(price.into());
        self
    }

    /// Mark the order reduce-only.
    pub fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }
}

impl OrderRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(quantity) = &self.quantity
            && quantity.trim().is_empty()
        {
            return Err("quantity must not be empty".to_string());
        }

        let has_price = matches!(&self.order_price, Some(Some(p)) if !p.trim().is_empty());
        if self.trigger_type == Some(TriggerType::Limit) && !has_price {
            return Err("LIMIT orders require order_price".to_string());
        }
        Ok(())
    }
}

/// Request body as sent to the order endpoint.
#[derive(Serialize)]
struct OrderBody<'a> {
    leverage: &'a str,
    quantity: &'a str,
    order_type: OrderType,
    trigger_type: TriggerType,
    reduce_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_price: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_stoploss: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stoploss_price: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_takeprofit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    takeprofit_price: Option<&'a str>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Serialize for OrderRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let stoploss_price = non_empty(&self.stoploss_price);
        let takeprofit_price = non_empty(&self.takeprofit_price);

        OrderBody {
            leverage: &self.leverage,
            quantity: &self.quantity,
            order_type: self.order_type,
            trigger_type: self.trigger_type,
            reduce_only: self.reduce_only,
            order_price: non_empty(&self.order_price),
            is_stoploss: stoploss_price.map(|_| true),
            stoploss_price,
            is_takeprofit: takeprofit_price.map(|_| true),
            takeprofit_price,
        }
        .serialize(serializer)
    }
}

/// An order as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    #[serde(default, deserialize_with = "de::flex_string")]
    pub order_id: String,
    /// Asset the order is for
    #[serde(default, deserialize_with = "de::flex_string")]
    pub asset_id: String,
    /// Trading symbol
    #[serde(default, deserialize_with = "de::flex_string")]
    pub symbol: String,
    /// Long or short
    #[serde(default)]
    pub order_type: OrderType,
    /// Market or limit
    #[serde(default)]
    pub trigger_type: TriggerType,
    /// Current state
    #[serde(default)]
    pub status: OrderStatus,
    /// Ordered quantity
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub quantity: String,
    /// Quantity filled so far
    #[serde(default = "zero", deserialize_with = "de::flex_string")]
    pub filled_quantity: String,
    /// Order price; empty for market orders without a price
    #[serde(default, deserialize_with = "de::flex_string")]
    pub price: String,
    /// Leverage multiplier
    #[serde(default = "one", deserialize_with = "de::flex_string")]
    pub leverage: String,
    /// Creation time
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Attached stop-loss price
    #[serde(default, deserialize_with = "de::opt_flex_string")]
    pub stoploss_price: Option<String>,
    /// Attached take-profit price
    #[serde(default, deserialize_with = "de::opt_flex_string")]
    pub takeprofit_price: Option<String>,
}

impl Model for Order {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("order_id", "id"), ("price", "order_price")];
}
