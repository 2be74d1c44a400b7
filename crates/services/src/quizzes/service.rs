use chrono::{DateTime, Utc};
use std::fmt;
use course_core::model::{AnswerSet, LessonId, Quiz, QuizId, QuizResult};

use super::progress::QuizProgress;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where a quiz attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Answers can be selected.
    Ready,
    /// Submit was requested with unanswered questions; waiting for the user.
    ConfirmIncomplete { remaining: usize },
    /// The answers are on their way to the backend.
    Submitting,
    /// A scored result is available.
    Result,
}

/// Status of marking the linked lesson complete after a pass.
///
/// Tracked apart from the result so a failure never changes the score shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AutoCompleteStatus {
    #[default]
    NotApplicable,
    Pending,
    Completed,
    Failed(String),
}

/// What the caller must do after asking to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStep {
    /// Ask the user to confirm; nothing was sent.
    NeedsConfirmation { remaining: usize },
    /// Send these answers, unchanged.
    Send(AnswerSet),
    /// The request does not apply in the current phase.
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory attempt at one quiz.
///
/// Owns the answer slots and the phase machine; the network calls are made by
/// `QuizLoopService` (or the UI) and fed back through `record_result` and
/// `record_failure`.
pub struct QuizSession {
    quiz: Quiz,
    answers: AnswerSet,
    phase: QuizPhase,
    result: Option<QuizResult>,
    auto_complete: AutoCompleteStatus,
    last_error: Option<String>,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start an attempt with every question unanswered.
    #[must_use]
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Self {
        let answers = AnswerSet::unanswered(quiz.question_count());
        Self {
            quiz,
            answers,
            phase: QuizPhase::Ready,
            result: None,
            auto_complete: AutoCompleteStatus::NotApplicable,
            last_error: None,
            started_at,
            submitted_at: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz.id
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn auto_complete(&self) -> &AutoCompleteStatus {
        &self.auto_complete
    }

    /// Message of the last failed submission, cleared on the next attempt.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.answers.len(),
            answered: self.answers.answered_count(),
            remaining: self.answers.unanswered_count(),
            is_complete: self.answers.is_complete(),
        }
    }

    /// Answers are editable only while `Ready`.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.phase != QuizPhase::Ready
    }

    /// Select `choice` for `question`. Returns `false` if nothing changed.
    pub fn select(&mut self, question: usize, choice: u32) -> bool {
        if self.is_locked() {
            return false;
        }
        let in_range = self
            .quiz
            .questions
            .get(question)
            .is_some_and(|q| usize::try_from(choice).is_ok_and(|c| c < q.choices.len()));
        in_range && self.answers.select(question, choice)
    }

    /// Ask to submit the current answers.
    ///
    /// With unanswered questions this moves to `ConfirmIncomplete` and sends
    /// nothing. Repeated requests outside `Ready` are ignored, so the
    /// confirmation is raised once.
    pub fn request_submit(&mut self) -> SubmitStep {
        if self.phase != QuizPhase::Ready {
            return SubmitStep::Ignored;
        }
        let remaining = self.answers.unanswered_count();
        if remaining > 0 {
            self.phase = QuizPhase::ConfirmIncomplete { remaining };
            return SubmitStep::NeedsConfirmation { remaining };
        }
        self.begin_submit()
    }

    /// Submit despite unanswered questions.
    pub fn confirm_submit(&mut self) -> SubmitStep {
        match self.phase {
            QuizPhase::ConfirmIncomplete { .. } => self.begin_submit(),
            _ => SubmitStep::Ignored,
        }
    }

    /// Dismiss the confirmation; answers are untouched.
    pub fn cancel_confirm(&mut self) {
        if matches!(self.phase, QuizPhase::ConfirmIncomplete { .. }) {
            self.phase = QuizPhase::Ready;
        }
    }

    fn begin_submit(&mut self) -> SubmitStep {
        self.phase = QuizPhase::Submitting;
        self.last_error = None;
        SubmitStep::Send(self.answers.clone())
    }

    /// Store a scored result.
    ///
    /// Returns the lesson to auto-complete when the attempt passed and the quiz
    /// is linked to one; the status is then `Pending`.
    pub fn record_result(
        &mut self,
        result: QuizResult,
        submitted_at: DateTime<Utc>,
    ) -> Option<LessonId> {
        if self.phase != QuizPhase::Submitting {
            return None;
        }
        let linked = self.quiz.lesson_id.filter(|_| result.passed);
        self.auto_complete = if linked.is_some() {
            AutoCompleteStatus::Pending
        } else {
            AutoCompleteStatus::NotApplicable
        };
        self.result = Some(result);
        self.submitted_at = Some(submitted_at);
        self.phase = QuizPhase::Result;
        linked
    }

    /// Return to `Ready` after a failed submission, keeping the answers.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        if self.phase == QuizPhase::Submitting {
            self.phase = QuizPhase::Ready;
            self.last_error = Some(message.into());
        }
    }

    pub fn set_auto_complete(&mut self, status: AutoCompleteStatus) {
        if self.result.is_some() {
            self.auto_complete = status;
        }
    }

    /// Start over: all questions unanswered, result and statuses cleared.
    pub fn reset(&mut self) {
        if self.phase == QuizPhase::Submitting {
            return;
        }
        self.answers = AnswerSet::unanswered(self.quiz.question_count());
        self.phase = QuizPhase::Ready;
        self.result = None;
        self.auto_complete = AutoCompleteStatus::NotApplicable;
        self.last_error = None;
        self.submitted_at = None;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz.id)
            .field("questions", &self.quiz.question_count())
            .field("answers", &self.answers.to_wire())
            .field("phase", &self.phase)
            .field("auto_complete", &self.auto_complete)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
