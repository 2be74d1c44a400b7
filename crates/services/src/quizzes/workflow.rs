use std::sync::Arc;

use api::repository::{LessonRepository, QuizRepository};
use course_core::model::{AnswerSet, LessonId, QuizId, QuizResult};

use super::service::{AutoCompleteStatus, QuizSession, SubmitStep};
use crate::Clock;
use crate::error::QuizError;

/// Result of driving one submit request through a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    NeedsConfirmation { remaining: usize },
    Ignored,
    Scored {
        result: QuizResult,
        auto_complete: AutoCompleteStatus,
    },
}

/// Orchestrates quiz start, submission and lesson auto-completion.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    lessons: Arc<dyn LessonRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        lessons: Arc<dyn LessonRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            lessons,
        }
    }

    /// Fetch the quiz and start an attempt with every question unanswered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Api` if the quiz cannot be fetched (403 when a
    /// subscription is required).
    pub async fn start_quiz(&self, quiz_id: QuizId) -> Result<QuizSession, QuizError> {
        let quiz = self.quizzes.get_quiz(quiz_id).await?;
        Ok(QuizSession::new(quiz, self.clock.now()))
    }

    /// Send `answers` as-is, unanswered slots included.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Api` if the backend rejects or fails the submission.
    pub async fn submit_answers(
        &self,
        quiz_id: QuizId,
        answers: &AnswerSet,
    ) -> Result<QuizResult, QuizError> {
        let result = self.quizzes.submit_quiz(quiz_id, answers).await?;
        log::info!(
            "quiz {quiz_id} scored {} ({})",
            result.score_label(),
            if result.passed { "passed" } else { "failed" }
        );
        Ok(result)
    }

    /// Mark the lesson a passed quiz is linked to as complete.
    ///
    /// Failures are logged and reported in the status, never as an error.
    pub async fn complete_linked_lesson(&self, lesson_id: LessonId) -> AutoCompleteStatus {
        match self.lessons.complete_lesson(lesson_id).await {
            Ok(()) => AutoCompleteStatus::Completed,
            Err(err) => {
                log::warn!("auto-completing lesson {lesson_id} failed: {err}");
                AutoCompleteStatus::Failed(err.to_string())
            }
        }
    }

    /// Request a submit on `session` and, if it goes out, send it and run the
    /// auto-completion.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the submission fails; the session is back in `Ready`.
    pub async fn submit(&self, session: &mut QuizSession) -> Result<SubmitOutcome, QuizError> {
        let step = session.request_submit();
        self.drive(session, step).await
    }

    /// Confirm a pending incomplete submit and send it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the submission fails; the session is back in `Ready`.
    pub async fn confirm(&self, session: &mut QuizSession) -> Result<SubmitOutcome, QuizError> {
        let step = session.confirm_submit();
        self.drive(session, step).await
    }

    async fn drive(
        &self,
        session: &mut QuizSession,
        step: SubmitStep,
    ) -> Result<SubmitOutcome, QuizError> {
        let answers = match step {
            SubmitStep::NeedsConfirmation { remaining } => {
                return Ok(SubmitOutcome::NeedsConfirmation { remaining });
            }
            SubmitStep::Ignored => return Ok(SubmitOutcome::Ignored),
            SubmitStep::Send(answers) => answers,
        };

        let result = match self.submit_answers(session.quiz_id(), &answers).await {
            Ok(result) => result,
            Err(err) => {
                session.record_failure(err.to_string());
                return Err(err);
            }
        };

        if let Some(lesson_id) = session.record_result(result.clone(), self.clock.now()) {
            let status = self.complete_linked_lesson(lesson_id).await;
            session.set_auto_complete(status);
        }

        Ok(SubmitOutcome::Scored {
            result,
            auto_complete: session.auto_complete().clone(),
        })
    }
}
