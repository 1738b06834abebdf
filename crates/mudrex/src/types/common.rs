//! Shared decoding helpers and pagination

use crate::error::{Error, Result};
use crate::http::decode_data;
use chrono::{DateTime, TimeZone, Utc};
use serde::de::{DeserializeOwned, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A model decoded from an API payload.
///
/// The API is not consistent about key names: an order may carry `id`
/// instead of `order_id`, a position `order_type` instead of `side`.
/// `ALIASES` lists `(canonical, fallback)` pairs; when the canonical key is
/// absent the fallback's value is used.
pub trait Model: DeserializeOwned {
    /// `(canonical, fallback)` key pairs.
    const ALIASES: &'static [(&'static str, &'static str)] = &[];
}

fn normalize<T: Model>(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        for (canonical, fallback) in T::ALIASES {
            let missing = map.get(*canonical).is_none_or(Value::is_null);
            if missing && let Some(v) = map.get(*fallback).cloned() {
                map.insert((*canonical).to_string(), v);
            }
        }
    }
    value
}

/// Decode a single model.
pub(crate) fn decode<T: Model>(data: Value) -> Result<T> {
    decode_data(normalize::<T>(data))
}

/// Decode a single model, treating a missing payload as an empty object.
pub(crate) fn decode_or_empty<T: Model>(data: Value) -> Result<T> {
    match data {
        Value::Null => decode(Value::Object(Map::new())),
        other => decode(other),
    }
}

/// Extract list items from a bare array or an object with `items`/`data`.
fn take_items(data: Value) -> Result<(Vec<Value>, Map<String, Value>)> {
    match data {
        Value::Array(items) => Ok((items, Map::new())),
        Value::Null => Ok((Vec::new(), Map::new())),
        Value::Object(mut map) => {
            let items = match map.remove("items").or_else(|| map.remove("data")) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(Error::transport_format(
                        format!("expected a list of items, got {other}"),
                        None,
                    ));
                }
            };
            Ok((items, map))
        }
        other => Err(Error::transport_format(
            format!("expected a list payload, got {other}"),
            None,
        )),
    }
}

/// Decode a list payload.
pub(crate) fn decode_list<T: Model>(data: Value) -> Result<Vec<T>> {
    let (items, _) = take_items(data)?;
    items.into_iter().map(decode).collect()
}

/// Decode a paginated payload.
pub(crate) fn decode_page<T: Model>(data: Value) -> Result<Page<T>> {
    let (items, meta) = take_items(data)?;
    let items = items.into_iter().map(decode).collect::<Result<Vec<T>>>()?;
    let len = items.len() as u64;

    let number = |key: &str| match meta.get(key) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    // out-of-range page numbers fall back to the defaults
    let page_number = |key: &str| number(key).and_then(|n| u32::try_from(n).ok());

    Ok(Page {
        page: page_number("page").unwrap_or(1),
        per_page: page_number("per_page").unwrap_or(u32::try_from(len).unwrap_or(u32::MAX)),
        total: number("total").unwrap_or(len),
        has_more: meta.get("has_more").and_then(Value::as_bool).unwrap_or(false),
        items,
    })
}

/// Set `key` on an object payload if it is absent.
pub(crate) fn fill_missing(data: &mut Value, key: &str, value: impl Into<Value>) {
    if let Value::Object(map) = data
        && map.get(key).is_none_or(Value::is_null)
    {
        map.insert(key.to_string(), value.into());
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Page number, starting at 1
    pub page: u32,
    /// Page size requested
    pub per_page: u32,
    /// Total number of items across all pages
    pub total: u64,
    /// Whether another page follows
    pub has_more: bool,
}

/// Query options for paginated listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Page number, starting at 1
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Field to sort by
    pub sort_by: Option<String>,
    /// `asc` or `desc`; only sent together with `sort_by`
    pub sort_order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
            sort_by: None,
            sort_order: SortOrder::Asc,
        }
    }
}

impl ListParams {
    /// Parameters for `page` with `per_page` items.
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            ..Default::default()
        }
    }

    /// Sort by `field` in `order`.
    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Serde helpers for the API's loosely typed fields.
pub(crate) mod de {
    use super::*;
    use serde::de;

    /// Decimal-as-string fields: accepts strings, numbers and booleans.
    /// `null` becomes an empty string.
    pub(crate) fn flex_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlexStringVisitor)
    }

    /// Optional decimal-as-string fields.
    pub(crate) fn opt_flex_string<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = deserializer.deserialize_any(FlexStringVisitor)?;
        Ok(Some(value).filter(|s| !s.is_empty()))
    }

    struct FlexStringVisitor;

    impl<'de> Visitor<'de> for FlexStringVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or null")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<String, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<String, E> {
            Ok(String::new())
        }
    }

    /// Timestamps as unix seconds, unix milliseconds (> 1e12), numeric
    /// strings or RFC 3339. Unparseable values become `None`.
    pub(crate) fn opt_timestamp<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(parse_timestamp))
    }

    pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::Number(n) => n.as_f64().and_then(from_unix),
            Value::String(s) => {
                let s = s.trim();
                match s.parse::<f64>() {
                    Ok(n) => from_unix(n),
                    Err(_) => DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc)),
                }
            }
            _ => None,
        }
    }

    fn from_unix(value: f64) -> Option<DateTime<Utc>> {
        if !value.is_finite() {
            return None;
        }
        let millis = if value > 1e12 { value } else { value * 1000.0 };
        Utc.timestamp_millis_opt(millis.round() as i64).single()
    }

    /// Booleans sent as `true`/`false`, `"true"`/`"false"` or `1`/`0`.
    pub(crate) fn flex_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(b),
            Value::Number(n) => Ok(n.as_f64().is_some_and(|n| n != 0.0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" | "" => Ok(false),
                other => Err(de::Error::custom(format!("invalid boolean '{other}'"))),
            },
            Value::Null => Ok(false),
            other => Err(de::Error::custom(format!("invalid boolean {other}"))),
        }
    }
}

/// Implements `as_str`, `Display`, case-insensitive `FromStr` and
/// `Deserialize` for a wire enum.
macro_rules! wire_enum {
    ($name:ident, $label:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// Wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> $crate::Result<Self> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err($crate::Error::InvalidRequest(format!(
                        concat!("unknown ", $label, " '{}'"),
                        s
                    ))),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use wire_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default, deserialize_with = "de::flex_string")]
        amount: String,
        #[serde(default, deserialize_with = "de::opt_flex_string")]
        price: Option<String>,
        #[serde(default, deserialize_with = "de::opt_timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default = "yes", deserialize_with = "de::flex_bool")]
        active: bool,
        #[serde(default)]
        sample_id: String,
    }

    fn yes() -> bool {
        true
    }

    impl Model for Sample {
        const ALIASES: &'static [(&'static str, &'static str)] = &[("sample_id", "id")];
    }

    #[test]
    fn test_flex_string_accepts_numbers() {
        let s: Sample = decode(json!({"amount": 12.5, "price": 100})).unwrap();
        assert_eq!(s.amount, "12.5");
        assert_eq!(s.price.as_deref(), Some("100"));
        assert!(s.active);

        let s: Sample = decode(json!({"amount": null, "price": null})).unwrap();
        assert_eq!(s.amount, "");
        assert_eq!(s.price, None);
    }

    #[test]
    fn test_timestamp_formats() {
        let secs = de::parse_timestamp(&json!(1_700_000_000)).unwrap();
        let millis = de::parse_timestamp(&json!(1_700_000_000_000u64)).unwrap();
        let text = de::parse_timestamp(&json!("2023-11-14T22:13:20Z")).unwrap();
        let numeric_text = de::parse_timestamp(&json!("1700000000000")).unwrap();

        assert_eq!(secs, millis);
        assert_eq!(secs, text);
        assert_eq!(secs, numeric_text);
        assert_eq!(de::parse_timestamp(&json!("yesterday")), None);
    }

    #[test]
    fn test_alias_fills_missing_key_only() {
        let s: Sample = decode(json!({"id": "abc"})).unwrap();
        assert_eq!(s.sample_id, "abc");

        let s: Sample = decode(json!({"id": "abc", "sample_id": "real"})).unwrap();
        assert_eq!(s.sample_id, "real");
    }

    #[test]
    fn test_list_shapes() {
        let bare: Vec<Sample> = decode_list(json!([{"amount": "1"}])).unwrap();
        let items: Vec<Sample> = decode_list(json!({"items": [{"amount": "1"}]})).unwrap();
        let data: Vec<Sample> = decode_list(json!({"data": [{"amount": "1"}]})).unwrap();
        let empty: Vec<Sample> = decode_list(json!({})).unwrap();

        assert_eq!(bare, items);
        assert_eq!(items, data);
        assert!(empty.is_empty());
        assert!(decode_list::<Sample>(json!("nope")).is_err());
    }

    #[test]
    fn test_page_defaults() {
        let page: Page<Sample> = decode_page(json!({
            "items": [{"amount": "1"}, {"amount": "2"}],
            "page": 3,
            "total": "40",
            "has_more": true
        }))
        .unwrap();

        assert_eq!(page.page, 3);
        assert_eq!(page.per_page, 2);
        assert_eq!(page.total, 40);
        assert!(page.has_more);

        let page: Page<Sample> = decode_page(json!([{"amount": "1"}])).unwrap();
        assert_eq!((page.page, page.per_page, page.total, page.has_more), (1, 1, 1, false));
    }

    #[test]
    fn test_page_numbers_out_of_range() {
        let page: Page<Sample> = decode_page(json!({
            "items": [{"amount": "1"}],
            "page": 8_589_934_592u64,
            "per_page": 4_294_967_296u64,
            "total": 8_589_934_592u64
        }))
        .unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.total, 8_589_934_592);
    }

    proptest::proptest! {
        #[test]
        fn prop_integers_become_their_decimal_text(n in proptest::num::i64::ANY) {
            let s: Sample = decode(json!({"amount": n})).unwrap();
            proptest::prop_assert_eq!(s.amount, n.to_string());
        }

        #[test]
        fn prop_seconds_and_millis_agree(secs in 1_000_000_000u64..4_000_000_000u64) {
            let from_secs = de::parse_timestamp(&json!(secs));
            let from_millis = de::parse_timestamp(&json!(secs * 1000));
            proptest::prop_assert!(from_secs.is_some());
            proptest::prop_assert_eq!(from_secs, from_millis);
        }
    }

    #[test]
    fn test_fill_missing() {
        let mut value = json!({"a": null, "b": "kept"});
        fill_missing(&mut value, "a", "filled");
        fill_missing(&mut value, "b", "ignored");
        assert_eq!(value, json!({"a": "filled", "b": "kept"}));
    }
}
