//! Configuration for the Mudrex client

use crate::error::{Error, Result};
use http::HeaderMap;
use mudrex_core::ratelimit::Quotas;
use mudrex_core::retry::ExponentialBackoff;
use secrecy::SecretString;
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries on rate limiting.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for the Mudrex client.
///
/// `Debug` output never contains the API secret.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API secret sent in the `X-Authentication` header
    pub api_secret: Option<SecretString>,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Maximum number of retries on rate-limit responses
    pub max_retries: u32,

    /// Client-side rate limiting; `None` disables it
    pub rate_limit: Option<RateLimitConfig>,

    /// Fallback delays used when the server gives no `Retry-After`
    pub backoff: BackoffConfig,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_secret: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            rate_limit: Some(RateLimitConfig::default()),
            backoff: BackoffConfig::default(),
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with an API secret.
    pub fn with_api_secret(api_secret: impl Into<String>) -> Self {
        Self {
            api_secret: Some(SecretString::new(api_secret.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Create a builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first, if present.
    /// Recognised variables:
    /// - `MUDREX_API_SECRET`
    /// - `MUDREX_BASE_URL`
    /// - `MUDREX_TIMEOUT` (seconds)
    /// - `MUDREX_MAX_RETRIES`
    /// - `MUDREX_RATE_LIMIT` (`false`/`0`/`off` disables client-side limiting)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a numeric variable does not parse.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(secret) = env::var("MUDREX_API_SECRET")
            && !secret.trim().is_empty()
        {
            config.api_secret = Some(SecretString::new(secret.into_boxed_str()));
        }

        if let Ok(base_url) = env::var("MUDREX_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(timeout) = env::var("MUDREX_TIMEOUT") {
            let secs: f64 = timeout
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("MUDREX_TIMEOUT: '{timeout}'")))?;
            config.timeout = Duration::try_from_secs_f64(secs)
                .map_err(|_| Error::InvalidConfig(format!("MUDREX_TIMEOUT: '{timeout}'")))?;
        }

        if let Ok(max_retries) = env::var("MUDREX_MAX_RETRIES") {
            config.max_retries = max_retries.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("MUDREX_MAX_RETRIES: '{max_retries}'"))
            })?;
        }

        if let Ok(flag) = env::var("MUDREX_RATE_LIMIT")
            && matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "off" | "no"
            )
        {
            config.rate_limit = None;
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    ///
    /// Scalar fields are taken from `other` only when they differ from the
    /// defaults.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.api_secret.is_some() {
            self.api_secret = other.api_secret;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if other.max_retries != DEFAULT_MAX_RETRIES {
            self.max_retries = other.max_retries;
        }
        if other.rate_limit != Some(RateLimitConfig::default()) {
            self.rate_limit = other.rate_limit;
        }
        if other.backoff != BackoffConfig::default() {
            self.backoff = other.backoff;
        }
        for (key, value) in other.default_headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }

        self
    }

    /// Resolved base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(crate::DEFAULT_BASE_URL)
    }

    /// Check that the configuration can build a client.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingConfig`] when no API secret is set
    /// - [`Error::InvalidUrl`] when the base URL is empty or not http(s)
    /// - [`Error::InvalidConfig`] for zero rate-limit ceilings or a zero timeout
    pub fn validate(&self) -> Result<()> {
        use secrecy::ExposeSecret;

        match &self.api_secret {
            Some(secret) if !secret.expose_secret().trim().is_empty() => {}
            _ => {
                return Err(Error::MissingConfig(
                    "API secret is required. Set MUDREX_API_SECRET or provide it explicitly."
                        .to_string(),
                ));
            }
        }

        let base_url = self.base_url();
        let parsed = url::Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("'{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "'{base_url}': scheme must be http or https"
            )));
        }

        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be non-zero".to_string()));
        }

        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.quotas()?;
        }

        Ok(())
    }
}

/// Client-side rate-limit ceilings.
///
/// Defaults match the published limits: 2/second, 50/minute, 1000/hour,
/// 10000/day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub per_second: u32,
    /// Maximum requests per minute
    pub per_minute: u32,
    /// Maximum requests per hour
    pub per_hour: u32,
    /// Maximum requests per day
    pub per_day: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 2,
            per_minute: 50,
            per_hour: 1000,
            per_day: 10_000,
        }
    }
}

impl RateLimitConfig {
    /// Convert to limiter quotas.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any ceiling is zero.
    pub fn quotas(&self) -> Result<Quotas> {
        Quotas::from_counts(self.per_second, self.per_minute, self.per_hour, self.per_day)
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "rate limit ceilings must be non-zero, got {}/s {}/min {}/h {}/day",
                    self.per_second, self.per_minute, self.per_hour, self.per_day
                ))
            })
    }
}

/// Fallback backoff used when a rate-limit response carries no `Retry-After`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any fallback delay
    pub max_delay: Duration,
    /// Growth factor per attempt
    pub multiplier: f64,
    /// Jitter fraction in `0.0..=1.0`
    pub jitter: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl BackoffConfig {
    /// Build the backoff strategy for `max_retries` retries.
    pub(crate) fn strategy(&self, max_retries: u32) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .max_retries(max_retries)
            .initial_delay(self.initial_delay)
            .max_delay(self.max_delay)
            .multiplier(self.multiplier)
            .jitter(self.jitter)
            .build()
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API secret.
    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.config.api_secret = Some(SecretString::new(api_secret.into().into_boxed_str()));
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of rate-limit retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set custom rate-limit ceilings.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable client-side rate limiting.
    pub fn without_rate_limiting(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set the fallback backoff.
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(format!("invalid header name '{key_str}'")))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(format!("invalid value for '{key_str}'")))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.rate_limit, Some(RateLimitConfig::default()));
        assert_eq!(config.base_url(), "https://trade.mudrex.com/fapi/v1");
        assert!(config.api_secret.is_none());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = ClientConfig::with_api_secret("super-secret-value");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-value"));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .api_secret("secret")
            .base_url("https://example.com/fapi/v1")
            .timeout(Duration::from_secs(10))
            .max_retries(5)
            .without_rate_limiting()
            .build();

        assert_eq!(config.api_secret.unwrap().expose_secret(), "secret");
        assert_eq!(config.base_url.as_deref(), Some("https://example.com/fapi/v1"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 5);
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_config_merge() {
        let base = ClientConfig::with_api_secret("secret");
        let overrides = ClientConfig::builder()
            .base_url("https://example.com")
            .timeout(Duration::from_secs(5))
            .default_header("X-Trace", "abc")
            .unwrap()
            .build();

        let merged = base.merge(overrides);
        assert!(merged.api_secret.is_some());
        assert_eq!(merged.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(merged.timeout, Duration::from_secs(5));
        assert_eq!(merged.max_retries, 3);
        assert_eq!(merged.default_headers["x-trace"], "abc");
    }

    #[test]
    fn test_validate_requires_secret() {
        assert_matches!(
            ClientConfig::default().validate(),
            Err(Error::MissingConfig(_))
        );
        assert_matches!(
            ClientConfig::with_api_secret("   ").validate(),
            Err(Error::MissingConfig(_))
        );
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = ClientConfig::with_api_secret("secret");
        config.base_url = Some(String::new());
        assert_matches!(config.validate(), Err(Error::InvalidUrl(_)));

        config.base_url = Some("ftp://example.com".to_string());
        assert_matches!(config.validate(), Err(Error::InvalidUrl(_)));

        config.base_url = Some("http://127.0.0.1:8080/fapi/v1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ceiling_is_invalid() {
        let config = ClientConfig::builder()
            .api_secret("secret")
            .rate_limit(RateLimitConfig {
                per_minute: 0,
                ..Default::default()
            })
            .build();

        assert_matches!(config.validate(), Err(Error::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_default_header() {
        let result = ClientConfig::builder().default_header("X-Bad", "line\nbreak");
        assert_matches!(result, Err(Error::InvalidHeaderValue(_)));
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("MUDREX_API_SECRET", Some("env-secret")),
                ("MUDREX_BASE_URL", Some("http://localhost:9000")),
                ("MUDREX_TIMEOUT", Some("12")),
                ("MUDREX_MAX_RETRIES", Some("7")),
                ("MUDREX_RATE_LIMIT", Some("false")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.api_secret.unwrap().expose_secret(), "env-secret");
                assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
                assert_eq!(config.timeout, Duration::from_secs(12));
                assert_eq!(config.max_retries, 7);
                assert!(config.rate_limit.is_none());
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env_rejects_garbage() {
        temp_env::with_vars(
            [
                ("MUDREX_API_SECRET", Some("env-secret")),
                ("MUDREX_MAX_RETRIES", Some("many")),
            ],
            || {
                assert_matches!(ClientConfig::from_env(), Err(Error::InvalidConfig(_)));
            },
        );
    }
}
