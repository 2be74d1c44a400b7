mod course;
mod ids;
mod lesson;
mod plan;
mod progress;
mod quiz;
mod user;

pub use ids::{AttemptId, CourseId, LessonId, ParseIdError, QuizId};

pub use course::{Course, CourseAccess, Difficulty, PricingTier, Viewer};
pub use lesson::{Lesson, completion_percent, next_lesson, sort_lessons};
pub use plan::{BillingPeriod, SubscriptionPlan, find_plan, format_price_cents, standard_plans};
pub use progress::{CompletedLesson, Progress, ProgressSummary, QuizAttemptRecord};
pub use quiz::{
    AnswerKey, AnswerSet, DEFAULT_PASS_PERCENT, GradeError, Question, Quiz, QuizResult, UNANSWERED,
    format_score,
};
pub use user::{AuthToken, UserProfile};
