use std::sync::Arc;

use api::{ApiConfig, Backend, Session};

use crate::Clock;
use crate::auth_service::AuthService;
use crate::catalog_service::CatalogService;
use crate::course_service::CourseService;
use crate::error::AppServicesError;
use crate::lesson_service::LessonService;
use crate::progress_service::ProgressService;
use crate::quizzes::QuizLoopService;
use crate::subscription_service::SubscriptionService;

/// Assembles app-facing services over one backend and session.
#[derive(Clone)]
pub struct AppServices {
    session: Session,
    catalog: Arc<CatalogService>,
    courses: Arc<CourseService>,
    lessons: Arc<LessonService>,
    quiz_loop: Arc<QuizLoopService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
    subscriptions: Arc<SubscriptionService>,
}

impl AppServices {
    /// Build services that talk to the REST API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Api` if the HTTP client cannot be built.
    pub fn new_http(
        config: ApiConfig,
        session: Session,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let backend = Backend::http(config, session.clone())?;
        Ok(Self::from_backend(backend, session, clock))
    }

    /// Build services over an existing backend, e.g. `Backend::in_memory()`.
    #[must_use]
    pub fn from_backend(backend: Backend, session: Session, clock: Clock) -> Self {
        let catalog = Arc::new(CatalogService::new(Arc::clone(&backend.courses)));
        let courses = Arc::new(CourseService::new(Arc::clone(&backend.courses)));
        let lessons = Arc::new(LessonService::new(Arc::clone(&backend.lessons)));
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::clone(&backend.quizzes),
            Arc::clone(&backend.lessons),
        ));
        let progress = Arc::new(ProgressService::new(Arc::clone(&backend.progress)));
        let auth = Arc::new(AuthService::new(
            Arc::clone(&backend.auth),
            Arc::clone(&backend.account),
            session.clone(),
        ));
        let subscriptions = Arc::new(SubscriptionService::new(
            clock,
            Arc::clone(&backend.account),
            session.clone(),
        ));

        Self {
            session,
            catalog,
            courses,
            lessons,
            quiz_loop,
            progress,
            auth,
            subscriptions,
        }
    }

    /// Replace the subscription service, e.g. to shorten the checkout delay.
    #[must_use]
    pub fn with_subscriptions(mut self, subscriptions: SubscriptionService) -> Self {
        self.subscriptions = Arc::new(subscriptions);
        self
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session.clone()
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn subscriptions(&self) -> Arc<SubscriptionService> {
        Arc::clone(&self.subscriptions)
    }
}
