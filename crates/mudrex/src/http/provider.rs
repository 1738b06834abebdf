//! HTTP provider trait and the reqwest-backed implementation

use super::{ApiRequest, Response};
use crate::error::{Error, Result};
use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, header};
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, sync::Arc, time::Duration};

/// Header carrying the API secret.
pub const AUTH_HEADER: &str = "x-authentication";

/// Sends one attempt of an [`ApiRequest`].
///
/// Implementations own transport concerns only: URL construction,
/// authentication headers and the per-request timeout. Rate limiting,
/// retries and envelope validation happen in
/// [`RequestPipeline`](super::RequestPipeline), which makes the trait easy to
/// replace in tests.
#[async_trait]
pub trait HttpProvider: Send + Sync + fmt::Debug {
    /// Send the request once and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] when the per-request timeout elapses
    /// - [`Error::Connection`] for other network failures
    /// - [`Error::InvalidUrl`] if the path does not form a valid URL
    async fn send(&self, request: &ApiRequest) -> Result<Response>;

    /// Get the provider name for debugging/logging.
    fn provider_name(&self) -> &'static str;

    /// Get the base URL for this provider (for debugging).
    fn base_url(&self) -> &str;
}

/// HTTP provider for the Mudrex REST API.
///
/// # Example
///
/// ```rust,no_run
/// use mudrex::http::MudrexHttpProvider;
///
/// let provider = MudrexHttpProvider::builder()
///     .api_secret("your-api-secret")
///     .timeout(std::time::Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MudrexHttpProvider {
    inner: Arc<ProviderInner>,
}

#[derive(Debug)]
struct ProviderInner {
    http_client: reqwest::Client,
    /// Base URL without a trailing slash
    base_url: String,
    timeout: Duration,
    /// Auth, content negotiation and caller defaults; the secret is marked sensitive
    headers: HeaderMap,
}

impl MudrexHttpProvider {
    /// Create a new builder for configuring the provider.
    pub fn builder() -> MudrexHttpProviderBuilder {
        MudrexHttpProviderBuilder::default()
    }

    fn url_for(&self, path: &str) -> Result<url::Url> {
        let joined = format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'));
        url::Url::parse(&joined)
            .map_err(|e| Error::InvalidUrl(format!("Failed to construct URL '{joined}': {e}")))
    }
}

#[async_trait]
impl HttpProvider for MudrexHttpProvider {
    async fn send(&self, request: &ApiRequest) -> Result<Response> {
        let url = self.url_for(request.path())?;

        let mut builder = self
            .inner
            .http_client
            .request(request.method().clone(), url)
            .headers(self.inner.headers.clone())
            .timeout(self.inner.timeout);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(|e| self.map_send_error(e))?;

        Ok(Response::new(status, headers, body))
    }

    fn provider_name(&self) -> &'static str {
        "mudrex"
    }

    fn base_url(&self) -> &str {
        &self.inner.base_url
    }
}

impl MudrexHttpProvider {
    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.inner.timeout)
        } else {
            Error::Connection(err.to_string())
        }
    }
}

/// Builder for creating a `MudrexHttpProvider` with custom configuration.
#[derive(Default)]
pub struct MudrexHttpProviderBuilder {
    api_secret: Option<SecretString>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
}

impl MudrexHttpProviderBuilder {
    /// Set the API secret sent as `X-Authentication`.
    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(SecretString::new(api_secret.into().into_boxed_str()));
        self
    }

    /// Set the API secret from an existing secret.
    pub fn api_secret_secret(mut self, api_secret: SecretString) -> Self {
        self.api_secret = Some(api_secret);
        self
    }

    /// Set the base URL for the API.
    ///
    /// Defaults to `https://trade.mudrex.com/fapi/v1`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add headers to include with every request.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        for (key, value) in headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Add a custom header to include with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key = key_str.parse::<HeaderName>().map_err(|e| {
            Error::InvalidHeaderValue(format!("Invalid header name '{key_str}': {e}"))
        })?;
        let value = value_str.parse::<HeaderValue>().map_err(|e| {
            Error::InvalidHeaderValue(format!("Invalid value for header '{key_str}': {e}"))
        })?;

        self.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the provider with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API secret is provided (and, with the `env` feature, none is set
    ///   in `MUDREX_API_SECRET`)
    /// - The secret is not a valid header value
    /// - The base URL is invalid
    /// - HTTP client creation fails
    pub fn build(mut self) -> Result<MudrexHttpProvider> {
        #[cfg(feature = "env")]
        if self.api_secret.is_none() {
            self.api_secret = std::env::var("MUDREX_API_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| SecretString::new(s.into_boxed_str()));
        }

        let api_secret = self
            .api_secret
            .filter(|s| !s.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                Error::MissingConfig(
                    "No API secret provided. Set MUDREX_API_SECRET or provide it explicitly."
                        .to_string(),
                )
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| crate::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| Error::InvalidUrl(format!("Invalid base URL '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "Invalid base URL '{base_url}': scheme must be http or https"
            )));
        }

        let timeout = self.timeout.unwrap_or(crate::config::DEFAULT_TIMEOUT);

        let mut headers = self.default_headers;
        let mut auth = HeaderValue::from_str(api_secret.expose_secret()).map_err(|_| {
            Error::InvalidHeaderValue("API secret contains invalid header characters".to_string())
        })?;
        auth.set_sensitive(true);
        headers.insert(HeaderName::from_static(AUTH_HEADER), auth);
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&format!("mudrex-rust/{}", crate::VERSION)).map_err(|e| {
                Error::InvalidHeaderValue(format!("Invalid User-Agent: {e}"))
            })?,
        );

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("Failed to create HTTP client: {e}")))?;

        Ok(MudrexHttpProvider {
            inner: Arc::new(ProviderInner {
                http_client,
                base_url,
                timeout,
                headers,
            }),
        })
    }
}
