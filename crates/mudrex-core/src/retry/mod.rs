//! Retry strategies and backoff implementations.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - Core trait for retry strategies
//! - [`RetryHint`] - Lets an error say whether it is retryable and how long to wait
//! - [`ExponentialBackoff`] - Exponential backoff with jitter
//!
//! # Examples
//!
//! ```rust
//! use mudrex_core::retry::{BackoffStrategy, ExponentialBackoff, RetryHint};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Throttled;
//!
//! impl RetryHint for Throttled {
//!     fn is_retryable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # async fn example() -> Result<(), Throttled> {
//! let backoff = ExponentialBackoff::builder()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build();
//!
//! let value = backoff.execute(|_attempt| async { Ok::<_, Throttled>(42) }).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

mod exponential;
mod strategy;

pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use strategy::{BackoffStrategy, RetryHint};
