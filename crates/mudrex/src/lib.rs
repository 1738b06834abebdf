//! # Mudrex SDK
//!
//! Async Rust client for the Mudrex futures trading API:
//! - Wallet balances and spot/futures transfers
//! - Asset discovery and leverage settings
//! - Market and limit orders, amendments and cancellation
//! - Position management with stop-loss / take-profit
//! - Fee history
//!
//! Every call goes through one request pipeline that injects the
//! `X-Authentication` header, waits on a client-side multi-window rate
//! limiter, retries on HTTP 429 (honouring `Retry-After`), and unwraps the
//! `{success, data, code, message}` response envelope.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mudrex::{Client, OrderType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("your-api-secret")?;
//!
//!     let balance = client.wallet().spot_balance().await?;
//!     println!("Available: {} {}", balance.available, balance.currency);
//!
//!     let order = client
//!         .orders()
//!         .create_market("BTCUSDT", OrderType::Long, "0.001", "5")
//!         .await?;
//!     println!("Placed order {}", order.order_id);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{BackoffConfig, ClientConfig, ClientConfigBuilder, RateLimitConfig};
pub use error::{ApiErrorDetails, Error, ErrorKind, Result};
pub use mudrex_core::ratelimit::{Window, WindowUsage};
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;
pub mod types;

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://trade.mudrex.com/fapi/v1";

/// SDK version, sent in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
