//! Common test utilities
//!
//! - wiremock servers standing in for the exchange
//! - envelope builders for canned responses
//! - a client wired to the mock server with fast retries

#![allow(dead_code)]

use mudrex::{BackoffConfig, Client};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::{MockServer, ResponseTemplate};

/// Secret used by every test client.
pub const SECRET: &str = "test-secret";

/// Path prefix mirroring the production base URL.
pub const PREFIX: &str = "/fapi/v1";

/// Successful envelope around `data`.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "data": data,
        "requestId": "req-ok",
        "ts": 1_700_000_000_000u64
    }))
}

/// Successful envelope without a payload.
pub fn ok_empty() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "done"}))
}

/// Error envelope with `code` and `message`.
pub fn api_error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false,
        "code": code,
        "message": message,
        "requestId": "req-err"
    }))
}

/// HTTP 429 with a `Retry-After` header.
pub fn throttled(retry_after: &str) -> ResponseTemplate {
    api_error(429, "RATE_LIMIT_EXCEEDED", "Too many requests")
        .insert_header("Retry-After", retry_after)
}

/// Full path for an endpoint under the API prefix.
pub fn api_path(endpoint: &str) -> String {
    format!("{PREFIX}{endpoint}")
}

/// Builder for a client talking to `server`, without client-side rate
/// limiting and with millisecond fallback delays.
pub fn client_builder(server: &MockServer) -> mudrex::ClientBuilder {
    Client::builder()
        .api_secret(SECRET)
        .base_url(format!("{}{PREFIX}", server.uri()))
        .timeout(Duration::from_secs(5))
        .without_rate_limiting()
        .backoff(BackoffConfig {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            multiplier: 2.0,
            jitter: 0.0,
        })
}

/// Client with default retries for `server`.
pub fn client(server: &MockServer) -> Client {
    client_builder(server).build().unwrap()
}
