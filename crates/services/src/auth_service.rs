use std::sync::Arc;

use api::Session;
use api::repository::{AccountRepository, AuthRepository, LoginRequest, SignupRequest};
use course_core::model::{AuthToken, UserProfile};

use crate::error::AuthError;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-in, sign-up and sign-out against the shared `Session`.
#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthRepository>,
    account: Arc<dyn AccountRepository>,
    session: Session,
}

impl AuthService {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthRepository>,
        account: Arc<dyn AccountRepository>,
        session: Session,
    ) -> Self {
        Self {
            auth,
            account,
            session,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for blank input,
    /// `AuthError::InvalidCredentials` when the backend answers 401.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = required("email", username)?;
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        let token = self
            .auth
            .login(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.adopt(token);
        log::info!("signed in as {username}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a validation error before any request is made, or
    /// `AuthError::Rejected` with the backend's reason (e.g. a taken email).
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let name = required("name", name)?;
        let email = required("email", email)?;
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        let token = self
            .auth
            .signup(&SignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.adopt(token);
        log::info!("created account for {email}");
        Ok(())
    }

    pub fn logout(&self) {
        if let Err(err) = self.session.sign_out() {
            log::warn!("could not clear persisted token: {err}");
        }
        log::info!("signed out");
    }

    /// Profile of the signed-in user; `None` when signed out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` if the profile cannot be fetched.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        if !self.is_signed_in() {
            return Ok(None);
        }
        match self.account.current_user().await {
            Ok(profile) => Ok(Some(profile)),
            Err(err) if err.is_unauthorized() => Ok(None),
            Err(err) => Err(AuthError::Api(err)),
        }
    }

    fn adopt(&self, token: AuthToken) {
        if let Err(err) = self.session.sign_in(token) {
            log::warn!("signed in for this run only; token not persisted: {err}");
        }
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}
