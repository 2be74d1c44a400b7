use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::Session;

/// Thin JSON client: base URL, timeout, bearer token, centralized failure logging.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ApiConfig,
    session: Session,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying client cannot be built.
    pub fn new(config: ApiConfig, session: Session) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns `ApiError` for transport failures and non-success statuses.
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` for transport failures and non-success statuses.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    /// `POST` without a request body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures and non-success statuses.
    pub async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(Method::POST, path, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let result = self.send(method.clone(), path, body).await;
        match &result {
            Ok(_) => log::debug!("{method} {path} ok"),
            Err(err) => log::warn!("{method} {path} failed: {err}"),
        }
        result
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = self.config.endpoint(path)?;
        let mut request = self.client.request(method, url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let bytes = response.bytes().await?;
        decode_body(&bytes)
    }
}

/// Empty bodies decode as `null`.
fn decode_body(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_null() {
        assert_eq!(decode_body(b"").unwrap(), Value::Null);
        assert_eq!(decode_body(b" \n").unwrap(), Value::Null);
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        assert!(matches!(decode_body(b"<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn json_body_is_parsed() {
        let value = decode_body(br#"{"message": "completed"}"#).unwrap();
        assert_eq!(value["message"], "completed");
    }
}
