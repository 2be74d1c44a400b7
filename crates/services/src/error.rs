//! Shared error types for the services crate.

use api::ApiError;
use thiserror::Error;

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `LessonService::load_lesson`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Why marking a lesson complete did not stick.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonCompletionError {
    #[error("subscribe to track progress on this lesson")]
    SubscriptionRequired,
    #[error("sign in to track your progress")]
    SignInRequired,
    #[error("could not mark the lesson complete: {0}")]
    Failed(String),
}

impl From<ApiError> for LessonCompletionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Forbidden(_) => Self::SubscriptionRequired,
            ApiError::Unauthorized => Self::SignInRequired,
            other => Self::Failed(other.to_string()),
        }
    }
}

/// Errors emitted by the quiz flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::InvalidCredentials,
            ApiError::BadRequest(detail) => Self::Rejected(detail),
            other => Self::Api(other),
        }
    }
}

/// Errors emitted by `SubscriptionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubscriptionError {
    #[error("sign in before purchasing a plan")]
    SignInRequired,
    #[error("unknown plan `{0}`")]
    UnknownPlan(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Access to the transport error behind a service error, if there is one.
pub trait ApiFailure {
    fn api_error(&self) -> Option<&ApiError>;

    /// The request was abandoned because its view went away.
    fn is_cancelled(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_cancelled)
    }
}

impl ApiFailure for CourseServiceError {
    fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
        }
    }
}

impl ApiFailure for LessonServiceError {
    fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
        }
    }
}

impl ApiFailure for QuizError {
    fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
        }
    }
}

impl ApiFailure for AuthError {
    fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl ApiFailure for SubscriptionError {
    fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}
