use std::sync::Arc;

use async_trait::async_trait;
use course_core::model::{
    AnswerSet, AuthToken, Course, CourseId, Lesson, LessonId, Progress, Quiz, QuizId, QuizResult,
    UserProfile,
};
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::HttpBackend;
use crate::memory::InMemoryBackend;
use crate::session::Session;

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/signup`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the catalog cannot be fetched.
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the course does not exist.
    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError>;

    /// Lessons of a course with the caller's completion flags.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the course does not exist.
    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, ApiError>;
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` when the lesson is gated behind a subscription.
    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError>;

    /// Mark a lesson complete for the caller. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the call.
    async fn complete_lesson(&self, id: LessonId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` when quizzes require a subscription.
    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, ApiError>;

    /// Score one attempt. `answers` is sent as-is, unanswered slots included.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` if the answer count does not match.
    async fn submit_quiz(&self, id: QuizId, answers: &AnswerSet) -> Result<QuizResult, ApiError>;
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if progress cannot be fetched.
    async fn get_progress(&self) -> Result<Progress, ApiError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials.
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` if the email is already registered.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthToken, ApiError>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the profile cannot be fetched.
    async fn current_user(&self) -> Result<UserProfile, ApiError>;

    /// Record a plan purchase for the caller.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the call.
    async fn subscribe(&self, plan_id: &str) -> Result<(), ApiError>;
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Backend {
    pub courses: Arc<dyn CourseRepository>,
    pub lessons: Arc<dyn LessonRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub auth: Arc<dyn AuthRepository>,
    pub account: Arc<dyn AccountRepository>,
}

impl Backend {
    /// Talk to the REST API described by `config`, authenticating with `session`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn http(config: ApiConfig, session: Session) -> Result<Self, ApiError> {
        let backend = Arc::new(HttpBackend::new(config, session)?);
        Ok(Self::from_shared(backend))
    }

    /// An empty in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_memory(InMemoryBackend::new())
    }

    #[must_use]
    pub fn from_memory(backend: InMemoryBackend) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: CourseRepository
            + LessonRepository
            + QuizRepository
            + ProgressRepository
            + AuthRepository
            + AccountRepository
            + 'static,
    {
        Self {
            courses: backend.clone(),
            lessons: backend.clone(),
            quizzes: backend.clone(),
            progress: backend.clone(),
            auth: backend.clone(),
            account: backend,
        }
    }
}
