//! Typed models for API payloads
//!
//! Prices, quantities and balances are kept as decimal strings exactly as the
//! exchange reports them; numeric JSON values are converted to strings on the
//! way in.

pub mod asset;
pub mod common;
pub mod fee;
pub mod leverage;
pub mod order;
pub mod position;
pub mod wallet;

pub use asset::Asset;
pub use common::{ListParams, Model, Page, SortOrder};
pub use fee::FeeRecord;
pub use leverage::{Leverage, MarginType};
pub use order::{
    Order, OrderRequest, OrderRequestBuilder, OrderRequestBuilderError, OrderStatus, OrderType,
    TriggerType,
};
pub use position::{Position, PositionStatus, RiskOrder};
pub use wallet::{FuturesBalance, TransferResult, WalletBalance, WalletType};
