#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core request-pacing primitives for the Mudrex SDK.
//!
//! This crate holds the two pieces of the request pipeline that are
//! independent of HTTP and of the Mudrex wire format:
//!
//! - **Retry strategies** via the [`BackoffStrategy`](retry::BackoffStrategy) trait
//!   - Server-hinted delays (`Retry-After`) take precedence
//!   - Exponential fallback with jitter when no hint is given
//!   - Errors classify themselves through [`RetryHint`](retry::RetryHint)
//! - **Multi-window rate limiting** via [`WindowedRateLimiter`](ratelimit::WindowedRateLimiter)
//!   - Independent per-second / minute / hour / day ceilings
//!   - FIFO admission, cancellation-safe `acquire()`
//!
//! # Examples
//!
//! ```rust
//! use mudrex_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let limiter = WindowedRateLimiter::new(Quotas::default());
//! limiter.acquire().await;
//!
//! let backoff = ExponentialBackoff::builder()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build();
//! assert_eq!(backoff.max_retries(), 3);
//! # Ok(())
//! # }
//! ```

pub mod ratelimit;
pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use mudrex_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ratelimit::{Quotas, Window, WindowUsage, WindowedRateLimiter};
    pub use crate::retry::{
        BackoffStrategy, ExponentialBackoff, ExponentialBackoffBuilder, RetryHint,
    };
}
