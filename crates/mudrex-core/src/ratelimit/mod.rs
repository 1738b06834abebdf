//! Client-side rate limiting over fixed time windows.
//!
//! A [`WindowedRateLimiter`] tracks four windows (second, minute, hour, day)
//! and admits a request only when every one of them has room. Counters
//! reset when their window elapses.
//!
//! ```rust
//! use mudrex_core::ratelimit::{Quotas, Window, WindowedRateLimiter};
//!
//! # async fn example() {
//! let limiter = WindowedRateLimiter::new(Quotas::from_counts(2, 50, 1000, 10_000).unwrap());
//! limiter.acquire().await;
//!
//! let usage = limiter.usage();
//! assert_eq!(usage[0].window, Window::Second);
//! assert_eq!(usage[0].count, 1);
//! # }
//! ```

mod limiter;
mod window;

pub use limiter::{Quotas, WindowUsage, WindowedRateLimiter};
pub use window::Window;
