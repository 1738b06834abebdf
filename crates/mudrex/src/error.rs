//! Error types for the Mudrex SDK
//!
//! Errors reported by the API arrive inside the response envelope as a
//! `code` string. They are grouped into a small taxonomy ([`ErrorKind`]) and
//! surfaced as variants of [`Error`] carrying [`ApiErrorDetails`]. Client-side
//! failures (network, configuration, argument validation) live in the same
//! enum.

use mudrex_core::retry::RetryHint;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with a Mudrex SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Details the API attaches to a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorDetails {
    /// Domain error code, e.g. `INSUFFICIENT_BALANCE`
    pub code: Option<String>,
    /// Human-readable message
    pub message: String,
    /// Server-assigned request id, for support tickets
    pub request_id: Option<String>,
    /// HTTP status of the response
    pub status: Option<u16>,
    /// The raw error envelope, kept for support and debugging
    pub response: Option<Value>,
}

impl ApiErrorDetails {
    /// Create details with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the raw response body.
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(code) = &self.code {
            write!(f, " (code: {code})")?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " [request_id: {request_id}]")?;
        }
        Ok(())
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing, invalid or insufficiently privileged credentials
    Authentication,
    /// The request was rejected as malformed
    Validation,
    /// The referenced resource does not exist
    NotFound,
    /// The request conflicts with current state
    Conflict,
    /// Not enough funds for the operation
    InsufficientBalance,
    /// Server-side throttling
    RateLimit,
    /// Server-side failure
    Server,
    /// The response body was not a valid envelope
    TransportFormat,
    /// An API error whose code is not recognised
    Unknown,
    /// Network failure or timeout
    Transport,
    /// Client-side configuration or argument error
    Client,
}

impl ErrorKind {
    /// Classify an API error code.
    ///
    /// Exact codes are checked first, then prefix/suffix families
    /// (`AUTH_*`, `INVALID_*`, `*_NOT_FOUND`, `DUPLICATE_*`, `*_CONFLICT`,
    /// `INSUFFICIENT_*`). Matching is case-insensitive.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        match code.as_str() {
            "UNAUTHORIZED" | "FORBIDDEN" => ErrorKind::Authentication,
            "RATE_LIMIT_EXCEEDED" | "RATE_LIMITED" | "TOO_MANY_REQUESTS" => ErrorKind::RateLimit,
            "INVALID_REQUEST" | "VALIDATION_ERROR" | "BAD_REQUEST" => ErrorKind::Validation,
            "NOT_FOUND" => ErrorKind::NotFound,
            "CONFLICT" => ErrorKind::Conflict,
            "INSUFFICIENT_BALANCE" => ErrorKind::InsufficientBalance,
            "SERVER_ERROR" | "INTERNAL_ERROR" | "SERVICE_UNAVAILABLE" => ErrorKind::Server,
            c if c.starts_with("AUTH_") => ErrorKind::Authentication,
            c if c.starts_with("INSUFFICIENT_") => ErrorKind::InsufficientBalance,
            c if c.ends_with("_NOT_FOUND") => ErrorKind::NotFound,
            c if c.starts_with("DUPLICATE_") || c.ends_with("_CONFLICT") => ErrorKind::Conflict,
            c if c.starts_with("INVALID_") => ErrorKind::Validation,
            _ => ErrorKind::Unknown,
        }
    }

    /// Classify by HTTP status alone.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => ErrorKind::Authentication,
            400 | 422 => ErrorKind::Validation,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimit,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }
}

/// Main error type for the Mudrex SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials were rejected.
    #[error("Authentication failed: {0}")]
    Authentication(ApiErrorDetails),

    /// The API rejected the request parameters.
    #[error("Validation error: {0}")]
    Validation(ApiErrorDetails),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(ApiErrorDetails),

    /// Request conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(ApiErrorDetails),

    /// Not enough balance to perform the operation.
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(ApiErrorDetails),

    /// Rate limit exceeded, and the retry budget (if any) is spent.
    #[error("Rate limit exceeded: {details}")]
    RateLimit {
        /// Error details
        details: ApiErrorDetails,
        /// Server-requested wait before the next attempt
        retry_after: Option<Duration>,
    },

    /// Server-side failure.
    #[error("Server error: {0}")]
    Server(ApiErrorDetails),

    /// API error with an unrecognised code.
    #[error("API error: {0}")]
    Api(ApiErrorDetails),

    /// The response body was not JSON, was not an envelope, or its payload
    /// did not match the expected model.
    #[error("Malformed response: {message}")]
    TransportFormat {
        /// What went wrong while decoding
        message: String,
        /// HTTP status of the response, if one was received
        status: Option<u16>,
    },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid request parameters, caught before sending.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error with added context.
    #[error("{context}: {source}")]
    WithContext {
        /// Context description
        context: String,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Build the error for a failed API call.
    ///
    /// `code` decides the variant when present; otherwise `status` does.
    pub fn from_api(details: ApiErrorDetails, retry_after: Option<Duration>) -> Self {
        let kind = match (&details.code, details.status) {
            (Some(code), _) => ErrorKind::from_code(code),
            (None, Some(status)) => ErrorKind::from_status(status),
            (None, None) => ErrorKind::Unknown,
        };

        match kind {
            ErrorKind::Authentication => Error::Authentication(details),
            ErrorKind::Validation => Error::Validation(details),
            ErrorKind::NotFound => Error::NotFound(details),
            ErrorKind::Conflict => Error::Conflict(details),
            ErrorKind::InsufficientBalance => Error::InsufficientBalance(details),
            ErrorKind::RateLimit => Error::RateLimit {
                details,
                retry_after,
            },
            ErrorKind::Server => Error::Server(details),
            _ => Error::Api(details),
        }
    }

    /// Create a [`Error::TransportFormat`] error.
    pub fn transport_format(message: impl Into<String>, status: Option<u16>) -> Self {
        Error::TransportFormat {
            message: message.into(),
            status,
        }
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication(_) => ErrorKind::Authentication,
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::InsufficientBalance(_) => ErrorKind::InsufficientBalance,
            Error::RateLimit { .. } => ErrorKind::RateLimit,
            Error::Server(_) => ErrorKind::Server,
            Error::Api(_) => ErrorKind::Unknown,
            Error::TransportFormat { .. } => ErrorKind::TransportFormat,
            Error::Connection(_) | Error::Timeout(_) => ErrorKind::Transport,
            Error::WithContext { source, .. } => source.kind(),
            _ => ErrorKind::Client,
        }
    }

    /// API details, for errors reported by the server.
    pub fn details(&self) -> Option<&ApiErrorDetails> {
        match self {
            Error::Authentication(d)
            | Error::Validation(d)
            | Error::NotFound(d)
            | Error::Conflict(d)
            | Error::InsufficientBalance(d)
            | Error::Server(d)
            | Error::Api(d) => Some(d),
            Error::RateLimit { details, .. } => Some(details),
            Error::WithContext { source, .. } => source.details(),
            _ => None,
        }
    }

    /// Domain error code, if the server sent one.
    pub fn code(&self) -> Option<&str> {
        self.details().and_then(|d| d.code.as_deref())
    }

    /// Server request id, if the server sent one.
    pub fn request_id(&self) -> Option<&str> {
        self.details().and_then(|d| d.request_id.as_deref())
    }

    /// The raw error envelope as the server sent it.
    pub fn raw_response(&self) -> Option<&Value> {
        self.details().and_then(|d| d.response.as_ref())
    }

    /// HTTP status of the failed response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::TransportFormat { status, .. } => *status,
            Error::WithContext { source, .. } => source.status(),
            _ => self.details().and_then(|d| d.status),
        }
    }

    /// Check if this error is retryable. Only rate limiting is.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::RateLimit
    }

    /// Get retry delay if this is a rate limit error with retry-after.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            Error::WithContext { source, .. } => source.retry_after(),
            _ => None,
        }
    }

    /// Add context to an error.
    pub fn context<C>(self, context: C) -> Self
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        Error::WithContext {
            context: context.to_string(),
            source: Box::new(self),
        }
    }
}

impl RetryHint for Error {
    fn is_retryable(&self) -> bool {
        Error::is_retryable(self)
    }

    fn retry_after(&self) -> Option<Duration> {
        Error::retry_after(self)
    }
}

impl From<crate::types::OrderRequestBuilderError> for Error {
    fn from(err: crate::types::OrderRequestBuilderError) -> Self {
        Error::InvalidRequest(err.to_string())
    }
}
