use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API base URL {raw:?}: {reason}")]
    InvalidBaseUrl { raw: String, reason: String },

    #[error("invalid API timeout {raw:?}: expected whole seconds > 0")]
    InvalidTimeout { raw: String },
}

/// Where the course API lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    timeout: Duration,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub const ENV_BASE_URL: &'static str = "COURSE_API_URL";
    pub const ENV_TIMEOUT_SECS: &'static str = "COURSE_API_TIMEOUT_SECS";

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` unless `base_url` is an absolute
    /// http(s) URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            raw: base_url.to_string(),
            reason,
        };
        let trimmed = base_url.trim();
        // `Url::join` drops the last path segment unless the base ends with '/'.
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base_url.scheme())));
        }
        Ok(Self { base_url, timeout })
    }

    /// Defaults overridden by `COURSE_API_URL` / `COURSE_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(
            env::var(Self::ENV_BASE_URL).ok().as_deref(),
            env::var(Self::ENV_TIMEOUT_SECS).ok().as_deref(),
        )
    }

    /// Build from optional raw values, falling back to the defaults for
    /// whatever is missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a given value is invalid.
    pub fn resolve(base_url: Option<&str>, timeout_secs: Option<&str>) -> Result<Self, ConfigError> {
        let timeout = match timeout_secs {
            Some(raw) => parse_timeout_secs(raw)?,
            None => Self::DEFAULT_TIMEOUT,
        };
        Self::new(base_url.unwrap_or(Self::DEFAULT_BASE_URL), timeout)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve an endpoint path such as `/courses/3/lessons` against the base URL.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }
}

/// Parse a timeout given in whole seconds.
///
/// # Errors
///
/// Returns `ConfigError::InvalidTimeout` for non-numeric or zero values.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let config = ApiConfig::new("https://example.com/api", Duration::from_secs(5)).unwrap();
        let url = config.endpoint("/courses/3/lessons").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/courses/3/lessons");
    }

    #[test]
    fn rejects_non_http_schemes() {
        let err = ApiConfig::new("ftp://example.com", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
        assert!(ApiConfig::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn timeout_must_be_positive() {
        assert_eq!(parse_timeout_secs("15").unwrap(), Duration::from_secs(15));
        assert!(parse_timeout_secs("0").is_err());
        assert!(parse_timeout_secs("soon").is_err());
    }

    #[test]
    fn default_points_at_localhost() {
        let config = ApiConfig::new(ApiConfig::DEFAULT_BASE_URL, ApiConfig::DEFAULT_TIMEOUT).unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout(), ApiConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn resolve_fills_missing_values_and_rejects_bad_ones() {
        let config = ApiConfig::resolve(None, Some("3")).unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout(), Duration::from_secs(3));

        let err = ApiConfig::resolve(Some("http://api.test"), Some("never")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { raw } if raw == "never"));
    }
}
