//! HTTP layer
//!
//! - [`ApiRequest`]: an immutable description of one logical call
//! - [`HttpProvider`]: sends a single attempt and returns the raw [`Response`]
//! - [`RequestPipeline`]: rate limiting, retry-on-429 and envelope validation
//!   on top of a provider

pub use pipeline::RequestPipeline;
pub use provider::{HttpProvider, MudrexHttpProvider, MudrexHttpProviderBuilder};
pub use request::ApiRequest;
pub use response::{Response, ResponseEnvelope};
pub(crate) use response::decode_data;

mod pipeline;
mod provider;
mod request;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
