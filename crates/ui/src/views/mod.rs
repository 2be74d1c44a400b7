mod auth;
mod catalog;
mod course;
mod lesson;
mod not_found;
mod progress;
mod quiz;
mod state;
mod subscription;

pub use auth::{LoginView, SignupView};
pub use catalog::CatalogView;
pub use course::CourseView;
pub use lesson::LessonView;
pub use not_found::NotFoundView;
pub use progress::ProgressView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, use_cancel_signal, view_state_from_resource};
pub use subscription::PricingView;

#[cfg(test)]
pub(crate) use quiz::QuizTestHandles;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
