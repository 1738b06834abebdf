//! Exponential backoff with jitter.

use super::strategy::{BackoffStrategy, RetryHint};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff strategy with configurable jitter.
///
/// Fallback delays grow as `initial_delay * multiplier^attempt`, capped at
/// `max_delay`. A delay hinted by the error ([`RetryHint::retry_after`]) is
/// used verbatim instead, without jitter or cap.
///
/// ```text
/// base_delay   = initial_delay * (multiplier ^ n)
/// jittered     = base_delay + base_delay * jitter * random(-1.0, +1.0)
/// final_delay  = min(jittered, max_delay)
/// ```
///
/// # Examples
///
/// ```rust
/// use mudrex_core::retry::{BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .jitter(0.0)
///     .build();
///
/// assert_eq!(backoff.next_delay(2), Some(Duration::from_millis(400)));
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Initial fallback delay.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Upper bound for fallback delays.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}

impl Default for ExponentialBackoff {
    /// Defaults:
    /// - `max_retries`: 3
    /// - `initial_delay`: 1s
    /// - `max_delay`: 30s
    /// - `multiplier`: 2.0
    /// - `jitter`: 0.1
    fn default() -> Self {
        ExponentialBackoffBuilder::default().build()
    }
}

#[async_trait]
impl BackoffStrategy for ExponentialBackoff {
    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn(u32) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: RetryHint + Send,
    {
        let mut attempt = 0;
        loop {
            match operation(attempt).await {
                Ok(result) => return Ok(result),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if attempt >= self.max_retries => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        attempts = attempt + 1,
                        retry_after_ms = err.retry_after().map(|d| d.as_millis() as u64),
                        "Retry budget exhausted"
                    );
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.delay_for(err.retry_after(), attempt);
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        hinted = err.retry_after().is_some(),
                        "Retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let base_delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);

        let jittered = if self.jitter > 0.0 {
            let jitter_amount = base_delay * self.jitter * (rand::random::<f64>() - 0.5) * 2.0;
            base_delay + jitter_amount
        } else {
            base_delay
        };

        let capped = jittered.min(self.max_delay.as_secs_f64()).max(0.0);
        Some(Duration::from_secs_f64(capped))
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Builder for configuring `ExponentialBackoff`.
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_retries: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl ExponentialBackoffBuilder {
    /// Set the maximum number of retry attempts.
    ///
    /// Default: 3
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the initial fallback delay.
    ///
    /// Default: 1s
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the cap for fallback delays.
    ///
    /// Default: 30s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the exponential multiplier.
    ///
    /// Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the jitter factor, clamped to `0.0..=1.0`.
    ///
    /// Default: 0.1
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Build the `ExponentialBackoff` instance.
    pub fn build(self) -> ExponentialBackoff {
        ExponentialBackoff {
            max_retries: self.max_retries.unwrap_or(3),
            initial_delay: self.initial_delay.unwrap_or(Duration::from_secs(1)),
            max_delay: self.max_delay.unwrap_or(Duration::from_secs(30)),
            multiplier: self.multiplier.unwrap_or(2.0),
            jitter: self.jitter.unwrap_or(0.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum TestError {
        Throttled(Option<Duration>),
        Fatal,
    }

    impl RetryHint for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, TestError::Throttled(_))
        }

        fn retry_after(&self) -> Option<Duration> {
            match self {
                TestError::Throttled(hint) => *hint,
                TestError::Fatal => None,
            }
        }
    }

    #[test]
    fn test_exponential_delay_calculation() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(10))
            .jitter(0.0)
            .build();

        assert_eq!(backoff.next_delay(0).unwrap(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(1).unwrap(), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(2).unwrap(), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(3).unwrap(), Duration::from_millis(800));
    }

    #[test]
    fn test_max_delay_cap() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5))
            .multiplier(10.0)
            .jitter(0.0)
            .build();

        for attempt in 5..10 {
            let delay = backoff.next_delay(attempt).unwrap();
            assert!(
                delay <= Duration::from_secs(5),
                "Delay at attempt {} ({:?}) exceeded max_delay",
                attempt,
                delay
            );
        }
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(60))
            .jitter(0.5)
            .build();

        for _ in 0..20 {
            let millis = backoff.next_delay(0).unwrap().as_millis();
            assert!(
                (500..=1500).contains(&millis),
                "Delay with 50% jitter should be in [500ms, 1500ms], got {}ms",
                millis
            );
        }
    }

    #[test]
    fn test_builder_defaults() {
        let backoff = ExponentialBackoff::default();

        assert_eq!(backoff.max_retries, 3);
        assert_eq!(backoff.initial_delay, Duration::from_secs(1));
        assert_eq!(backoff.max_delay, Duration::from_secs(30));
        assert_eq!(backoff.multiplier, 2.0);
        assert_eq!(backoff.jitter, 0.1);
    }

    #[test]
    fn test_jitter_clamped() {
        assert_eq!(ExponentialBackoff::builder().jitter(2.0).build().jitter, 1.0);
        assert_eq!(ExponentialBackoff::builder().jitter(-0.5).build().jitter, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hinted_delay_is_honoured() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(3)
            .initial_delay(Duration::from_millis(1))
            .jitter(0.0)
            .build();

        let attempts = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let result = backoff
            .execute(|_| {
                let attempts = Arc::clone(&attempts);
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(TestError::Throttled(Some(Duration::from_secs(2))))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_returns_last_error() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(2)
            .jitter(0.0)
            .build();

        let attempts = Arc::new(AtomicU32::new(0));

        let result = backoff
            .execute(|attempt| {
                let attempts = Arc::clone(&attempts);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(TestError::Throttled(Some(Duration::from_secs(
                        u64::from(attempt) + 1,
                    ))))
                }
            })
            .await;

        // initial attempt + 2 retries, last hint was attempt 2 -> 3s
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(
            result,
            Err(TestError::Throttled(Some(Duration::from_secs(3))))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_delay_without_hint() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(2)
            .initial_delay(Duration::from_millis(500))
            .jitter(0.0)
            .build();

        let started = tokio::time::Instant::now();
        let result = backoff
            .execute(|_| async { Err::<(), _>(TestError::Throttled(None)) })
            .await;

        assert!(result.is_err());
        // 500ms + 1000ms of fallback sleeps
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_non_retryable_error_is_immediate() {
        let backoff = ExponentialBackoff::builder().max_retries(5).build();
        let attempts = Arc::new(AtomicU32::new(0));

        let result = backoff
            .execute(|_| {
                let attempts = Arc::clone(&attempts);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(TestError::Fatal)
                }
            })
            .await;

        assert_eq!(result, Err(TestError::Fatal));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let backoff = ExponentialBackoff::default();
        let result = backoff.execute(|_| async { Ok::<_, TestError>(42) }).await;
        assert_eq!(result, Ok(42));
    }
}
