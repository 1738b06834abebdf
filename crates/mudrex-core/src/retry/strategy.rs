//! Retry strategy trait and error classification.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Classification an error exposes to a [`BackoffStrategy`].
///
/// The strategy never inspects error contents itself; it only asks whether
/// the failure may be retried and whether the remote side asked for a
/// specific delay.
pub trait RetryHint {
    /// Whether the failed operation may be attempted again.
    fn is_retryable(&self) -> bool;

    /// Delay requested by the remote side, if any.
    ///
    /// When present it overrides the strategy's own delay calculation.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// A strategy for retrying failed operations with backoff.
///
/// Implementations decide how long to wait between attempts and when to
/// give up. The operation receives the zero-based attempt number so callers
/// can log or tag individual attempts.
///
/// # Examples
///
/// ```rust
/// use mudrex_core::retry::{BackoffStrategy, ExponentialBackoff, RetryHint};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct Busy;
///
/// impl RetryHint for Busy {
///     fn is_retryable(&self) -> bool {
///         true
///     }
///
///     fn retry_after(&self) -> Option<Duration> {
///         Some(Duration::from_millis(5))
///     }
/// }
///
/// # async fn example() -> Result<(), Busy> {
/// let backoff = ExponentialBackoff::builder().max_retries(3).build();
/// let calls = Arc::new(AtomicU32::new(0));
///
/// let value = backoff
///     .execute(|_attempt| {
///         let calls = Arc::clone(&calls);
///         async move {
///             if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///                 Err(Busy)
///             } else {
///                 Ok(7)
///             }
///         }
///     })
///     .await?;
/// assert_eq!(value, 7);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait BackoffStrategy: Send + Sync {
    /// Execute an operation with retry logic.
    ///
    /// The operation is called until it succeeds, returns an error whose
    /// [`RetryHint::is_retryable`] is `false`, or the retry budget is spent.
    /// In the last case the final error is returned unchanged, so any
    /// `retry_after` it carries reaches the caller.
    ///
    /// Dropping the returned future during a backoff sleep abandons the
    /// call without further attempts.
    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn(u32) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: RetryHint + Send;

    /// Calculate the fallback delay before the next retry attempt.
    ///
    /// `attempt` is zero-based: `next_delay(0)` is the wait before the
    /// second try. Returning `None` means no fallback delay is available.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;

    /// Maximum number of retries after the initial attempt.
    ///
    /// With `max_retries() == 3` an operation runs at most 4 times.
    fn max_retries(&self) -> u32;

    /// Resolve the delay for a retry: the remote hint wins, otherwise the
    /// strategy's own schedule.
    fn delay_for(&self, hint: Option<Duration>, attempt: u32) -> Duration {
        hint.or_else(|| self.next_delay(attempt))
            .unwrap_or(Duration::ZERO)
    }
}
