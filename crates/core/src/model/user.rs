use std::fmt;

use serde::Deserialize;

use crate::lenient;
use crate::model::course::Viewer;

/// Profile of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient::u64")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_subscriber: bool,
}

impl UserProfile {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    #[must_use]
    pub fn viewer(&self) -> Viewer {
        Viewer {
            signed_in: true,
            subscriber: self.is_subscriber,
        }
    }
}

/// Opaque bearer token issued on login/signup.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a non-blank token.
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_rejected() {
        assert!(AuthToken::parse("   ").is_none());
        assert_eq!(AuthToken::parse(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn debug_hides_the_secret() {
        let token = AuthToken::parse("demo-token-1").unwrap();
        assert_eq!(format!("{token:?}"), "AuthToken(***)");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let profile = UserProfile {
            email: "demo@test.com".into(),
            ..UserProfile::default()
        };
        assert_eq!(profile.display_name(), "demo@test.com");
        assert!(profile.viewer().signed_in);
    }
}
