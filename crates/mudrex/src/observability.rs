//! Structured logging for API calls
//!
//! Every logical call is logged through this module so field names stay
//! consistent: `method`, `path`, `attempt`, `status`, `elapsed_ms`.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path relative to the base URL
    pub path: String,
    /// Whether the request carries a JSON body
    pub has_body: bool,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            has_body: false,
        }
    }

    /// Mark the request as carrying a body
    pub fn with_body(mut self, has_body: bool) -> Self {
        self.has_body = has_body;
        self
    }

    /// Log one attempt being sent
    pub fn log_attempt(&self, attempt: u32) {
        debug!(
            method = %self.method,
            path = %self.path,
            attempt = attempt + 1,
            has_body = self.has_body,
            "Sending API request"
        );
    }

    /// Log a rate-limit response that will be retried
    pub fn log_rate_limited(&self, attempt: u32, retry_after: Option<Duration>) {
        warn!(
            method = %self.method,
            path = %self.path,
            attempt = attempt + 1,
            retry_after_ms = retry_after.map(|d| d.as_millis() as u64),
            "Rate limited by server"
        );
    }
}

/// Outcome metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status of the last attempt, if one completed
    pub status: Option<u16>,
    /// Time elapsed for the whole call, including retries and limiter waits
    pub elapsed: Duration,
    /// Number of attempts made
    pub attempts: u32,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(elapsed: Duration, attempts: u32) -> Self {
        Self {
            status: None,
            elapsed,
            attempts,
        }
    }

    /// Set the HTTP status
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Log successful call
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            attempts = self.attempts,
            "API request succeeded"
        );
    }

    /// Log failed call
    pub fn log_error(&self, request: &RequestMetadata, error: &crate::Error) {
        warn!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            attempts = self.attempts,
            kind = ?error.kind(),
            code = error.code(),
            request_id = error.request_id(),
            error = %error,
            "API request failed"
        );
    }
}

/// Timer for measuring request duration
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a `tracing-subscriber` formatter honouring `RUST_LOG`.
///
/// Intended for demos and small bots; applications usually configure their
/// own subscriber. Calling it twice is harmless.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mudrex=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_builders() {
        let request = RequestMetadata::new("POST", "/futures/BTCUSDT/order").with_body(true);
        assert!(request.has_body);

        let response = ResponseMetadata::new(Duration::from_millis(12), 2).with_status(200);
        assert_eq!(response.status, Some(200));
        assert_eq!(response.attempts, 2);
    }

    #[test]
    fn test_logging_does_not_panic_with_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let request = RequestMetadata::new("GET", "/wallet/funds");
            request.log_attempt(0);
            request.log_rate_limited(0, Some(Duration::from_secs(1)));

            let response = ResponseMetadata::new(Duration::from_millis(5), 1);
            response.log_success(&request);
            response.log_error(&request, &crate::Error::Timeout(Duration::from_secs(30)));
        });
    }

    #[test]
    fn test_timer_measures() {
        let timer = RequestTimer::start();
        assert!(timer.elapsed() < Duration::from_secs(5));
    }
}
