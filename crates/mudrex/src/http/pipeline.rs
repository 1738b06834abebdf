//! Request pipeline: rate limiting, retry-on-429 and envelope validation

use super::{ApiRequest, HttpProvider};
use crate::error::Result;
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use mudrex_core::ratelimit::WindowedRateLimiter;
use mudrex_core::retry::{BackoffStrategy, ExponentialBackoff};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Runs a logical API call through the full request pipeline.
///
/// For every attempt:
/// 1. wait on the client-side rate limiter (if enabled)
/// 2. send through the [`HttpProvider`]
/// 3. validate the response envelope
///
/// Rate-limit errors (HTTP 429 or a rate-limit error code) are retried after
/// the server's `Retry-After`, or an exponential fallback without one, up to
/// the configured budget. Every other error is returned immediately.
///
/// Dropping the returned future at any await point abandons the call; a
/// pending limiter wait does not consume capacity.
#[derive(Clone)]
pub struct RequestPipeline {
    provider: Arc<dyn HttpProvider>,
    limiter: Option<Arc<WindowedRateLimiter>>,
    backoff: ExponentialBackoff,
}

impl fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("provider", &self.provider.provider_name())
            .field("base_url", &self.provider.base_url())
            .field("rate_limited", &self.limiter.is_some())
            .field("max_retries", &self.backoff.max_retries())
            .finish()
    }
}

impl RequestPipeline {
    /// Create a pipeline.
    ///
    /// `limiter` is shared with every clone of the pipeline; pass `None` to
    /// disable client-side limiting.
    pub fn new(
        provider: Arc<dyn HttpProvider>,
        limiter: Option<Arc<WindowedRateLimiter>>,
        backoff: ExponentialBackoff,
    ) -> Self {
        Self {
            provider,
            limiter,
            backoff,
        }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn HttpProvider> {
        &self.provider
    }

    /// The client-side rate limiter, if enabled.
    pub fn limiter(&self) -> Option<&WindowedRateLimiter> {
        self.limiter.as_deref()
    }

    /// Maximum rate-limit retries per call.
    pub fn max_retries(&self) -> u32 {
        self.backoff.max_retries()
    }

    /// Execute `request` and return the envelope's `data` payload.
    ///
    /// # Errors
    ///
    /// Any [`Error`](crate::Error): the mapped API error, a
    /// [`TransportFormat`](crate::Error::TransportFormat) error for
    /// malformed bodies, transport failures, or
    /// [`RateLimit`](crate::Error::RateLimit) once retries are exhausted.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        let metadata = RequestMetadata::new(request.method().as_str(), request.path())
            .with_body(request.body().is_some());
        let timer = RequestTimer::start();
        let attempts = AtomicU32::new(0);
        let max_retries = self.backoff.max_retries();

        let outcome = self
            .backoff
            .execute(|attempt| {
                let metadata = &metadata;
                let attempts = &attempts;
                async move {
                    if let Some(limiter) = &self.limiter {
                        limiter.acquire().await;
                    }

                    attempts.store(attempt + 1, Ordering::Relaxed);
                    metadata.log_attempt(attempt);

                    let response = self.provider.send(request).await?;
                    let status = response.status().as_u16();

                    match response.into_data() {
                        Ok(data) => Ok((data, status)),
                        Err(err) => {
                            if err.is_retryable() && attempt < max_retries {
                                metadata.log_rate_limited(attempt, err.retry_after());
                            }
                            Err(err)
                        }
                    }
                }
            })
            .await;

        let summary = ResponseMetadata::new(timer.elapsed(), attempts.load(Ordering::Relaxed));
        match outcome {
            Ok((data, status)) => {
                summary.with_status(status).log_success(&metadata);
                Ok(data)
            }
            Err(err) => {
                let summary = match err.status() {
                    Some(status) => summary.with_status(status),
                    None => summary,
                };
                summary.log_error(&metadata, &err);
                Err(err)
            }
        }
    }
}
