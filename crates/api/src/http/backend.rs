use async_trait::async_trait;
use course_core::model::{
    AnswerSet, AuthToken, Course, CourseId, Lesson, LessonId, Progress, Quiz, QuizId, QuizResult,
    UserProfile, sort_lessons,
};

use super::client::HttpClient;
use super::wire::{self, SubmitQuizBody, SubscribeBody};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::repository::{
    AccountRepository, AuthRepository, CourseRepository, LessonRepository, LoginRequest,
    ProgressRepository, QuizRepository, SignupRequest,
};
use crate::session::Session;

/// Implements every repository over the REST API.
#[derive(Clone)]
pub struct HttpBackend {
    client: HttpClient,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig, session: Session) -> Result<Self, ApiError> {
        Ok(Self {
            client: HttpClient::new(config, session)?,
        })
    }

    /// `GET /health`; any 2xx counts as healthy.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend cannot be reached.
    pub async fn health(&self) -> Result<(), ApiError> {
        self.client.get("/health").await.map(|_| ())
    }
}

#[async_trait]
impl CourseRepository for HttpBackend {
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let value = self.client.get("/courses").await?;
        Ok(wire::list(value, &["courses", "items", "data"]))
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let value = self.client.get(&format!("/courses/{id}")).await?;
        wire::record(value)
    }

    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, ApiError> {
        let value = self
            .client
            .get(&format!("/courses/{course_id}/lessons"))
            .await?;
        let mut lessons: Vec<Lesson> = wire::list(value, &["lessons", "items", "data"]);
        // The lesson list omits the parent id.
        for lesson in &mut lessons {
            if lesson.course_id == CourseId::default() {
                lesson.course_id = course_id;
            }
        }
        sort_lessons(&mut lessons);
        Ok(lessons)
    }
}

#[async_trait]
impl LessonRepository for HttpBackend {
    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        let value = self.client.get(&format!("/lessons/{id}")).await?;
        wire::record(value)
    }

    async fn complete_lesson(&self, id: LessonId) -> Result<(), ApiError> {
        self.client
            .post_empty(&format!("/lessons/{id}/complete"))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl QuizRepository for HttpBackend {
    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, ApiError> {
        let value = self.client.get(&format!("/quizzes/{id}")).await?;
        wire::record(value)
    }

    async fn submit_quiz(&self, id: QuizId, answers: &AnswerSet) -> Result<QuizResult, ApiError> {
        let body = SubmitQuizBody {
            answers: answers.to_wire(),
        };
        let value = self
            .client
            .post(&format!("/quizzes/{id}/submit"), &body)
            .await?;
        wire::record(value)
    }
}

#[async_trait]
impl ProgressRepository for HttpBackend {
    async fn get_progress(&self) -> Result<Progress, ApiError> {
        let value = self.client.get("/users/me/progress").await?;
        wire::record(value)
    }
}

#[async_trait]
impl AuthRepository for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, ApiError> {
        let value = self.client.post("/auth/login", request).await?;
        wire::token(&value)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthToken, ApiError> {
        let value = self.client.post("/auth/signup", request).await?;
        wire::token(&value)
    }
}

#[async_trait]
impl AccountRepository for HttpBackend {
    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let value = self.client.get("/users/me").await?;
        wire::record(value)
    }

    async fn subscribe(&self, plan_id: &str) -> Result<(), ApiError> {
        self.client
            .post("/subscribe", &SubscribeBody { plan: plan_id })
            .await
            .map(|_| ())
    }
}
