//! HTTP response handling and envelope validation

use crate::error::{ApiErrorDetails, Error, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const BODY_SNIPPET_CHARS: usize = 200;

/// Raw HTTP response for a single attempt.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Check if the response is successful (2xx status).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Delay requested by the `Retry-After` header.
    ///
    /// Accepts integer or fractional seconds, or an HTTP date.
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();

        if let Ok(secs) = value.parse::<f64>() {
            return Duration::try_from_secs_f64(secs).ok();
        }

        let date = chrono::DateTime::parse_from_rfc2822(value).ok()?;
        let wait = date.with_timezone(&chrono::Utc) - chrono::Utc::now();
        Some(wait.to_std().unwrap_or(Duration::ZERO))
    }

    /// Validate the envelope and return its `data` payload.
    ///
    /// # Errors
    ///
    /// - [`Error::RateLimit`] for HTTP 429, whatever the body
    /// - [`Error::TransportFormat`] if the body is not a JSON envelope
    /// - the mapped API error when `success` is `false`
    pub fn into_data(self) -> Result<Value> {
        let status = self.status.as_u16();
        let retry_after = self.retry_after();
        let parsed = serde_json::from_slice::<ResponseEnvelope>(&self.body);

        if self.status == StatusCode::TOO_MANY_REQUESTS {
            let mut details = match parsed {
                Ok(envelope) => envelope.error_details(status),
                Err(_) => ApiErrorDetails::new("Rate limit exceeded").with_status(status),
            };
            details.response = self.raw_json();
            if details.code.is_none() {
                details.code = Some("RATE_LIMIT_EXCEEDED".to_string());
            }
            return Err(Error::RateLimit {
                details,
                retry_after,
            });
        }

        let envelope = parsed.map_err(|e| {
            Error::transport_format(
                format!("{e}; body: {}", self.body_snippet()),
                Some(status),
            )
        })?;

        if envelope.success {
            return Ok(envelope.data.unwrap_or(Value::Null));
        }
        let mut details = envelope.error_details(status);
        details.response = self.raw_json();
        Err(Error::from_api(details, retry_after))
    }

    fn raw_json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    fn body_snippet(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let mut snippet: String = text.chars().take(BODY_SNIPPET_CHARS).collect();
        if text.chars().count() > BODY_SNIPPET_CHARS {
            snippet.push_str("...");
        }
        snippet
    }
}

/// The `{success, data, code, message, requestId, ts}` wrapper around
/// every API response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Whether the call succeeded
    pub success: bool,
    /// Payload on success
    #[serde(default)]
    pub data: Option<Value>,
    /// Error code on failure
    #[serde(default)]
    pub code: Option<String>,
    /// Error or status message
    #[serde(default)]
    pub message: Option<String>,
    /// Server request id
    #[serde(default)]
    pub request_id: Option<String>,
    /// Server timestamp
    #[serde(default)]
    pub ts: Option<Value>,
}

impl ResponseEnvelope {
    /// `data` on success (JSON `null` when absent), the mapped error otherwise.
    pub fn into_result(self, status: u16, retry_after: Option<Duration>) -> Result<Value> {
        if self.success {
            return Ok(self.data.unwrap_or(Value::Null));
        }
        Err(Error::from_api(self.error_details(status), retry_after))
    }

    fn error_details(self, status: u16) -> ApiErrorDetails {
        ApiErrorDetails {
            code: self.code.filter(|c| !c.trim().is_empty()),
            message: self
                .message
                .unwrap_or_else(|| "An unknown error occurred".to_string()),
            request_id: self.request_id,
            status: Some(status),
            response: None,
        }
    }
}

/// Decode an envelope payload into a model.
///
/// A payload that does not match the model is a
/// [`Error::TransportFormat`], not a serialization error.
pub(crate) fn decode_data<T: DeserializeOwned>(data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| {
        Error::transport_format(
            format!("unexpected payload for {}: {e}", std::any::type_name::<T>()),
            None,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(status: u16, body: &str) -> Response {
        Response::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.to_string(),
        )
    }

    #[test]
    fn test_success_returns_data_unchanged() {
        let data = response(200, r#"{"success":true,"data":{"x":1}}"#)
            .into_data()
            .unwrap();
        assert_eq!(data, json!({"x": 1}));
    }

    #[test]
    fn test_success_without_data_is_null() {
        let data = response(200, r#"{"success":true,"message":"ok"}"#)
            .into_data()
            .unwrap();
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn test_error_envelope_is_mapped() {
        let error = response(
            401,
            r#"{"success":false,"code":"AUTH_INVALID","message":"bad key","requestId":"r1"}"#,
        )
        .into_data()
        .unwrap_err();

        assert_matches!(&error, Error::Authentication(d) if d.message == "bad key");
        assert_eq!(error.request_id(), Some("r1"));
        assert_eq!(error.status(), Some(401));
        assert_eq!(
            error.raw_response(),
            Some(&json!({
                "success": false,
                "code": "AUTH_INVALID",
                "message": "bad key",
                "requestId": "r1"
            }))
        );
    }

    #[test]
    fn test_error_envelope_without_code_uses_status() {
        let error = response(404, r#"{"success":false,"message":"no such order"}"#)
            .into_data()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_non_json_body_is_transport_format() {
        let error = response(200, "<html>gateway</html>").into_data().unwrap_err();
        assert_matches!(error, Error::TransportFormat { status: Some(200), .. });
    }

    #[test]
    fn test_missing_success_flag_is_transport_format() {
        let error = response(200, r#"{"data":{"x":1}}"#).into_data().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TransportFormat);

        let error = response(200, "[1,2,3]").into_data().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TransportFormat);
    }

    #[test]
    fn test_429_is_rate_limit_even_with_plain_body() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::RETRY_AFTER, "2".parse().unwrap());
        let error = Response::new(StatusCode::TOO_MANY_REQUESTS, headers, "slow down")
            .into_data()
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::RateLimit);
        assert_eq!(error.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(error.code(), Some("RATE_LIMIT_EXCEEDED"));
        assert_eq!(error.raw_response(), None);
    }

    #[test]
    fn test_rate_limit_code_on_200_is_retryable() {
        let error = response(
            200,
            r#"{"success":false,"code":"RATE_LIMIT_EXCEEDED","message":"too fast"}"#,
        )
        .into_data()
        .unwrap_err();

        assert!(error.is_retryable());
        assert_eq!(error.retry_after(), None);
    }

    #[test]
    fn test_retry_after_parsing() {
        let with = |value: &str| {
            let mut headers = HeaderMap::new();
            headers.insert(http::header::RETRY_AFTER, value.parse().unwrap());
            Response::new(StatusCode::TOO_MANY_REQUESTS, headers, "").retry_after()
        };

        assert_eq!(with("3"), Some(Duration::from_secs(3)));
        assert_eq!(with("0.5"), Some(Duration::from_millis(500)));
        assert_eq!(with("-1"), None);
        assert_eq!(with("Wed, 21 Oct 2015 07:28:00 GMT"), Some(Duration::ZERO));
        assert_eq!(with("soon"), None);
    }

    #[test]
    fn test_decode_data_mismatch_is_transport_format() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            field: u32,
        }

        let error = decode_data::<Needs>(json!({"other": true})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TransportFormat);
    }
}
