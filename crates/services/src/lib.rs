#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod catalog_service;
pub mod course_service;
pub mod error;
pub mod lesson_service;
pub mod progress_service;
pub mod quizzes;
pub mod subscription_service;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use catalog_service::{ALL_CATEGORIES, CatalogNotice, CatalogPage, CatalogService};
pub use course_service::{CoursePage, CourseService};
pub use error::{
    ApiFailure, AppServicesError, AuthError, CourseServiceError, LessonCompletionError,
    LessonServiceError, QuizError, SubscriptionError,
};
pub use lesson_service::{LessonPage, LessonService};
pub use progress_service::{ProgressPage, ProgressService};
pub use quizzes::{
    AutoCompleteStatus, QuizLoopService, QuizPhase, QuizProgress, QuizSession, SubmitOutcome,
    SubmitStep,
};
pub use subscription_service::{PurchaseReceipt, SubscriptionService};
