//! Shape-tolerant field decoders for API records.
//!
//! Every helper here accepts any JSON value and falls back to the field's
//! default when the value is missing, `null`, or of the wrong shape. Numbers
//! delivered as strings are parsed.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::time::parse_api_timestamp;

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Option::<Value>::deserialize(deserializer)
}

/// Strings; numbers and booleans are rendered, everything else is empty.
///
/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match any(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Optional non-empty string.
///
/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match any(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(any(deserializer)?
        .as_ref()
        .and_then(value_as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or_default())
}

/// `None` when the value is missing, `null`, or not a number.
///
/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(any(deserializer)?
        .as_ref()
        .and_then(value_as_u64)
        .and_then(|v| u32::try_from(v).ok()))
}

/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(any(deserializer)?
        .as_ref()
        .and_then(value_as_u64)
        .unwrap_or_default())
}

/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(any(deserializer)?
        .as_ref()
        .and_then(value_as_f64)
        .unwrap_or_default())
}

/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(any(deserializer)?
        .as_ref()
        .and_then(value_as_bool)
        .unwrap_or_default())
}

/// Identifier newtypes built from a `u64`.
///
/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<u64> + Default,
{
    Ok(any(deserializer)?
        .as_ref()
        .and_then(value_as_u64)
        .map_or_else(T::default, T::from))
}

/// Optional identifier; `null`, missing and malformed values all become `None`.
///
/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn opt_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u64>,
{
    Ok(any(deserializer)?.as_ref().and_then(value_as_u64).map(T::from))
}

/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn opt_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match any(deserializer)? {
        Some(Value::String(s)) => parse_api_timestamp(&s),
        _ => None,
    })
}

/// Lists of records; elements that fail to decode are dropped.
///
/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match any(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Lists of integers where unparsable entries become `-1`.
///
/// # Errors
///
/// Never fails for well-formed JSON input.
pub fn i64_vec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
    Ok(match any(deserializer)? {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Number(n) => n.as_i64().unwrap_or(-1),
                Value::String(s) => s.trim().parse().unwrap_or(-1),
                _ => -1,
            })
            .collect(),
        Some(Value::String(s)) => serde_json::from_str(&s).unwrap_or_default(),
        _ => Vec::new(),
    })
}
