//! Request bodies and tolerant response unwrapping.

use course_core::model::AuthToken;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub(crate) struct SubmitQuizBody {
    pub(crate) answers: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubscribeBody<'a> {
    pub(crate) plan: &'a str,
}

/// A list of records, either bare or wrapped in one of `keys`.
/// Elements that fail to decode are skipped.
pub(crate) fn list<T: DeserializeOwned>(value: Value, keys: &[&str]) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => keys
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if decoded.len() != total {
        log::warn!("skipped {} malformed records", total - decoded.len());
    }
    decoded
}

/// A single record; anything other than a JSON object is rejected.
pub(crate) fn record<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    if !value.is_object() {
        return Err(ApiError::Decode(format!("expected an object, got {value}")));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `{ "access_token": "..." }`
pub(crate) fn token(value: &Value) -> Result<AuthToken, ApiError> {
    value
        .get("access_token")
        .and_then(Value::as_str)
        .and_then(AuthToken::parse)
        .ok_or_else(|| ApiError::Decode("response has no access_token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::Course;
    use serde_json::json;

    #[test]
    fn list_accepts_bare_and_wrapped_arrays() {
        let bare: Vec<Course> = list(json!([{"id": 1}, {"id": 2}]), &["courses"]);
        assert_eq!(bare.len(), 2);

        let wrapped: Vec<Course> = list(json!({"courses": [{"id": 3}]}), &["courses"]);
        assert_eq!(wrapped.len(), 1);

        let nothing: Vec<Course> = list(json!("nope"), &["courses"]);
        assert!(nothing.is_empty());
    }

    #[test]
    fn list_skips_malformed_items() {
        let courses: Vec<Course> = list(json!([{"id": 1}, 42, "x"]), &[]);
        assert_eq!(courses.len(), 1);
    }

    #[test]
    fn record_requires_object() {
        assert!(record::<Course>(json!([1])).is_err());
        assert!(record::<Course>(json!({"id": 1})).is_ok());
    }

    #[test]
    fn token_requires_access_token() {
        assert!(token(&json!({"access_token": "demo-token-1", "token_type": "bearer"})).is_ok());
        assert!(token(&json!({"token_type": "bearer"})).is_err());
        assert!(token(&json!({"access_token": ""})).is_err());
    }
}
