mod progress;
mod service;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::{QuizProgress, remaining_label};
pub use service::{AutoCompleteStatus, QuizPhase, QuizSession, SubmitStep};
pub use workflow::{QuizLoopService, SubmitOutcome};
