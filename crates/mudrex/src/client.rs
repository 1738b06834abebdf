//! Main client for the Mudrex futures API

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use mudrex_core::ratelimit::{WindowUsage, WindowedRateLimiter};

use crate::{
    config::{BackoffConfig, ClientConfig, ClientConfigBuilder, RateLimitConfig},
    error::Result,
    http::{HttpProvider, MudrexHttpProvider, RequestPipeline},
    resources::{Assets, Fees, LeverageSettings, Orders, Positions, Wallet},
};

/// Mudrex API client.
///
/// Cheap to clone: clones share the HTTP connection pool, the rate limiter
/// and the lazily created resources. Use one client per API secret so its
/// limiter sees every request made with that secret.
///
/// # Example
///
/// ```rust,no_run
/// use mudrex::Client;
/// use std::time::Duration;
///
/// # fn main() -> mudrex::Result<()> {
/// let client = Client::builder()
///     .api_secret("your-api-secret")
///     .timeout(Duration::from_secs(10))
///     .max_retries(5)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    pipeline: RequestPipeline,

    wallet: OnceLock<Wallet>,
    assets: OnceLock<Assets>,
    leverage: OnceLock<LeverageSettings>,
    orders: OnceLock<Orders>,
    positions: OnceLock<Positions>,
    fees: OnceLock<Fees>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("pipeline", &self.inner.pipeline)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`](crate::Error::MissingConfig) for an
    /// empty secret.
    pub fn new(api_secret: impl Into<String>) -> Result<Self> {
        Self::builder().api_secret(api_secret).build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    ///
    /// With the `env` feature, a missing secret is read from
    /// `MUDREX_API_SECRET`.
    ///
    /// # Errors
    ///
    /// Any error from [`ClientConfig::validate`], or a failure building the
    /// HTTP client.
    #[cfg_attr(not(feature = "env"), allow(unused_mut))]
    pub fn from_config(mut config: ClientConfig) -> Result<Self> {
        #[cfg(feature = "env")]
        if config.api_secret.is_none() {
            config.api_secret = std::env::var("MUDREX_API_SECRET")
                .ok()
                .map(|s| secrecy::SecretString::new(s.into_boxed_str()));
        }

        config.validate()?;

        let mut provider = MudrexHttpProvider::builder()
            .base_url(config.base_url())
            .timeout(config.timeout)
            .default_headers(config.default_headers.clone());
        if let Some(secret) = config.api_secret.clone() {
            provider = provider.api_secret_secret(secret);
        }

        Self::from_provider(Arc::new(provider.build()?), config)
    }

    /// Create a client from environment variables (and a `.env` file).
    ///
    /// See [`ClientConfig::from_env`] for the variables read.
    #[cfg(feature = "env")]
    #[cfg_attr(docsrs, doc(cfg(feature = "env")))]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client on top of a custom transport.
    ///
    /// Only the rate-limit, retry and backoff settings of `config` are used;
    /// the provider owns authentication, base URL and timeout.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig) for zero
    /// rate-limit ceilings.
    pub fn from_provider(provider: Arc<dyn HttpProvider>, config: ClientConfig) -> Result<Self> {
        let limiter = match &config.rate_limit {
            Some(rate_limit) => Some(Arc::new(WindowedRateLimiter::new(rate_limit.quotas()?))),
            None => None,
        };
        let backoff = config.backoff.strategy(config.max_retries);

        tracing::debug!(
            provider = provider.provider_name(),
            base_url = provider.base_url(),
            rate_limited = limiter.is_some(),
            max_retries = config.max_retries,
            "Creating Mudrex client"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                pipeline: RequestPipeline::new(provider, limiter, backoff),
                wallet: OnceLock::new(),
                assets: OnceLock::new(),
                leverage: OnceLock::new(),
                orders: OnceLock::new(),
                positions: OnceLock::new(),
                fees: OnceLock::new(),
            }),
        })
    }

    /// Wallet balances and transfers.
    pub fn wallet(&self) -> &Wallet {
        self.inner
            .wallet
            .get_or_init(|| Wallet::new(self.inner.pipeline.clone()))
    }

    /// Asset discovery.
    pub fn assets(&self) -> &Assets {
        self.inner
            .assets
            .get_or_init(|| Assets::new(self.inner.pipeline.clone()))
    }

    /// Leverage settings.
    pub fn leverage(&self) -> &LeverageSettings {
        self.inner
            .leverage
            .get_or_init(|| LeverageSettings::new(self.inner.pipeline.clone()))
    }

    /// Order placement and management.
    pub fn orders(&self) -> &Orders {
        self.inner
            .orders
            .get_or_init(|| Orders::new(self.inner.pipeline.clone()))
    }

    /// Position management.
    pub fn positions(&self) -> &Positions {
        self.inner
            .positions
            .get_or_init(|| Positions::new(self.inner.pipeline.clone()))
    }

    /// Fee history.
    pub fn fees(&self) -> &Fees {
        self.inner
            .fees
            .get_or_init(|| Fees::new(self.inner.pipeline.clone()))
    }

    /// The request pipeline shared by all resources.
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.inner.pipeline
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.inner.pipeline.provider().base_url()
    }

    /// Current usage of each rate-limit window, or `None` when client-side
    /// limiting is disabled.
    pub fn rate_limit_usage(&self) -> Option<Vec<WindowUsage>> {
        self.inner.pipeline.limiter().map(|limiter| limiter.usage())
    }
}

/// Builder for [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfigBuilder,
}

impl ClientBuilder {
    /// Set the API secret.
    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.config = self.config.api_secret(api_secret);
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.base_url(base_url);
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the maximum number of rate-limit retries per call.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.max_retries(max_retries);
        self
    }

    /// Set client-side rate-limit ceilings.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.config = self.config.rate_limit(rate_limit);
        self
    }

    /// Disable client-side rate limiting.
    pub fn without_rate_limiting(mut self) -> Self {
        self.config = self.config.without_rate_limiting();
        self
    }

    /// Set the fallback backoff used without `Retry-After`.
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.config = self.config.backoff(backoff);
        self
    }

    /// Add a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        self.config = self.config.default_header(key, value)?;
        Ok(self)
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// See [`Client::from_config`].
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use assert_matches::assert_matches;

    #[test]
    fn test_new_with_secret() {
        let client = Client::new("test-secret").unwrap();
        assert_eq!(client.base_url(), crate::DEFAULT_BASE_URL);
        assert_eq!(client.pipeline().max_retries(), 3);
        assert_eq!(client.rate_limit_usage().map(|u| u.len()), Some(4));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        temp_env::with_var_unset("MUDREX_API_SECRET", || {
            assert_matches!(Client::new("  "), Err(Error::MissingConfig(_)));
        });
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_secret_from_environment() {
        temp_env::with_var("MUDREX_API_SECRET", Some("env-secret"), || {
            let client = Client::from_config(ClientConfig::default());
            assert!(client.is_ok());
        });
    }

    #[test]
    fn test_builder_settings() {
        let client = Client::builder()
            .api_secret("test-secret")
            .base_url("http://localhost:9999/fapi/v1/")
            .max_retries(0)
            .without_rate_limiting()
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "http://localhost:9999/fapi/v1");
        assert_eq!(client.pipeline().max_retries(), 0);
        assert!(client.rate_limit_usage().is_none());
    }

    #[test]
    fn test_zero_ceiling_is_rejected() {
        let result = Client::builder()
            .api_secret("test-secret")
            .rate_limit(RateLimitConfig {
                per_second: 0,
                ..Default::default()
            })
            .build();
        assert_matches!(result, Err(Error::InvalidConfig(_)));
    }

    #[test]
    fn test_resources_are_shared() {
        let client = Client::new("test-secret").unwrap();
        let clone = client.clone();
        assert!(std::ptr::eq(client.orders(), clone.orders()));
        assert!(std::ptr::eq(client.wallet(), client.wallet()));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let client = Client::new("very-secret-token").unwrap();
        assert!(!format!("{client:?}").contains("very-secret-token"));
    }
}
