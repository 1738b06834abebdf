//! API resource endpoints
//!
//! One type per endpoint group, reached through the matching
//! [`Client`](crate::Client) accessor. Every call goes through the client's
//! shared [`RequestPipeline`](crate::http::RequestPipeline), so resources
//! share one rate limiter and retry policy.

pub mod assets;
pub mod fees;
pub mod leverage;
pub mod orders;
pub mod positions;
pub mod wallet;

pub use assets::Assets;
pub use fees::Fees;
pub use leverage::LeverageSettings;
pub use orders::Orders;
pub use positions::Positions;
pub use wallet::Wallet;

use crate::error::{Error, Result};
use std::fmt;

/// A validated identifier destined for one URL path segment.
///
/// `Display` percent-encodes the value, so `format!` keeps it inside its
/// segment; [`PathId::as_str`] gives the raw value for filling models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathId<'a>(&'a str);

impl<'a> PathId<'a> {
    pub(crate) fn as_str(&self) -> &'a str {
        self.0
    }
}

impl fmt::Display for PathId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in url::form_urlencoded::byte_serialize(self.0.as_bytes()) {
            // form encoding turns spaces into '+', which a path keeps literally
            f.write_str(if chunk == "+" { "%20" } else { chunk })?;
        }
        Ok(())
    }
}

/// Validate an identifier that is placed in the URL path.
///
/// Rejects empty values, dot segments and `/`; everything else is
/// percent-encoded when formatted.
pub(crate) fn path_id<'a>(name: &str, value: &'a str) -> Result<PathId<'a>> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidRequest(format!("{name} must not be empty")));
    }
    if value == "." || value == ".." {
        return Err(Error::InvalidRequest(format!(
            "{name} must not be a dot segment: {value}"
        )));
    }
    if value.contains('/') {
        return Err(Error::InvalidRequest(format!(
            "{name} must not contain '/': {value}"
        )));
    }
    Ok(PathId(value))
}

/// Reject empty decimal-string arguments.
pub(crate) fn decimal_arg<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidRequest(format!("{name} must not be empty")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_path_id() {
        assert_eq!(path_id("asset_id", " BTCUSDT ").unwrap().as_str(), "BTCUSDT");
        assert_matches!(path_id("asset_id", ""), Err(Error::InvalidRequest(_)));
        assert_matches!(path_id("order_id", "a/b"), Err(Error::InvalidRequest(_)));
        assert_matches!(path_id("order_id", ".."), Err(Error::InvalidRequest(_)));
        assert_matches!(path_id("order_id", " . "), Err(Error::InvalidRequest(_)));
    }

    #[test]
    fn test_path_id_stays_in_its_segment() {
        let encode = |value| path_id("order_id", value).unwrap().to_string();

        assert_eq!(encode("ord-1_a.b"), "ord-1_a.b");
        assert_eq!(encode("p-1?x="), "p-1%3Fx%3D");
        assert_eq!(encode("a#b"), "a%23b");
        assert_eq!(encode("a b+c"), "a%20b%2Bc");
        assert_eq!(encode("50%"), "50%25");
        assert_eq!(encode("..."), "...");
    }

    #[test]
    fn test_decimal_arg() {
        assert_eq!(decimal_arg("amount", "10.5").unwrap(), "10.5");
        assert_matches!(decimal_arg("amount", "  "), Err(Error::InvalidRequest(_)));
    }
}
