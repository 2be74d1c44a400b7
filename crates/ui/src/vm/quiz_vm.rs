use course_core::model::{LessonId, QuizId, QuizResult};
use services::{
    AutoCompleteStatus, QuizError, QuizLoopService, QuizPhase, QuizSession, SubmitStep,
    quizzes::remaining_label,
};

/// User actions on the quiz page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select { question: usize, choice: u32 },
    Submit,
    Confirm,
    CancelConfirm,
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub index: u32,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub number: usize,
    pub text: String,
    pub choices: Vec<ChoiceVm>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizResultVm {
    pub score_label: String,
    pub passed: bool,
    pub headline: &'static str,
    pub tally: String,
    pub next_lesson_id: Option<LessonId>,
}

impl QuizResultVm {
    fn new(result: &QuizResult) -> Self {
        Self {
            score_label: result.score_label(),
            passed: result.passed,
            headline: if result.passed { "Passed" } else { "Not passed yet" },
            tally: format!("{} of {} correct", result.correct, result.total),
            next_lesson_id: result.next_lesson_id,
        }
    }
}

/// View-model around a quiz attempt.
pub struct QuizVm {
    session: QuizSession,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.session.quiz_id()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.session.quiz().title
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn pass_label(&self) -> String {
        format!("Pass mark: {}%", self.session.quiz().pass_percent)
    }

    #[must_use]
    pub fn answered_label(&self) -> String {
        let progress = self.session.progress();
        format!("{} of {} answered", progress.answered, progress.total)
    }

    /// Choices are disabled while submitting and once a result exists.
    #[must_use]
    pub fn inputs_disabled(&self) -> bool {
        self.session.is_locked()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase() == QuizPhase::Submitting
    }

    #[must_use]
    pub fn questions(&self) -> Vec<QuestionVm> {
        let answers = self.session.answers();
        self.session
            .quiz()
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionVm {
                index,
                number: index + 1,
                text: question.text.clone(),
                choices: question
                    .choices
                    .iter()
                    .zip(0_u32..)
                    .map(|(label, choice)| ChoiceVm {
                        index: choice,
                        label: label.clone(),
                        selected: answers.get(index) == Some(choice),
                    })
                    .collect(),
            })
            .collect()
    }

    /// "N questions remaining" while the confirmation dialog is open.
    #[must_use]
    pub fn confirmation_label(&self) -> Option<String> {
        match self.phase() {
            QuizPhase::ConfirmIncomplete { remaining } => Some(remaining_label(remaining)),
            _ => None,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<QuizResultVm> {
        self.session.result().map(QuizResultVm::new)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.session.last_error()
    }

    /// Notice about the linked lesson, never affecting the score shown.
    #[must_use]
    pub fn auto_complete_notice(&self) -> Option<(&'static str, bool)> {
        match self.session.auto_complete() {
            AutoCompleteStatus::NotApplicable => None,
            AutoCompleteStatus::Pending => Some(("Marking the lesson complete…", false)),
            AutoCompleteStatus::Completed => Some(("Lesson marked complete.", false)),
            AutoCompleteStatus::Failed(_) => {
                Some(("Your score is saved, but the lesson couldn't be marked complete.", true))
            }
        }
    }

    pub fn select(&mut self, question: usize, choice: u32) -> bool {
        self.session.select(question, choice)
    }

    pub fn request_submit(&mut self) -> SubmitStep {
        self.session.request_submit()
    }

    pub fn confirm_submit(&mut self) -> SubmitStep {
        self.session.confirm_submit()
    }

    pub fn cancel_confirm(&mut self) {
        self.session.cancel_confirm();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn record_result(
        &mut self,
        result: QuizResult,
        submitted_at: chrono::DateTime<chrono::Utc>,
    ) -> Option<LessonId> {
        self.session.record_result(result, submitted_at)
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.session.record_failure(message);
    }

    pub fn set_auto_complete(&mut self, status: AutoCompleteStatus) {
        self.session.set_auto_complete(status);
    }
}

/// Fetch the quiz and wrap a fresh attempt.
///
/// # Errors
///
/// Returns `QuizError` if the quiz cannot be fetched.
pub async fn start_quiz(
    quiz_loop: &QuizLoopService,
    quiz_id: QuizId,
) -> Result<QuizVm, QuizError> {
    quiz_loop.start_quiz(quiz_id).await.map(QuizVm::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{Question, Quiz};
    use course_core::time::fixed_now;

    fn vm() -> QuizVm {
        let quiz = Quiz {
            id: QuizId::new(1),
            title: "Basics".into(),
            pass_percent: 60,
            questions: vec![
                Question {
                    id: 1,
                    text: "First".into(),
                    choices: vec!["a".into(), "b".into()],
                },
                Question {
                    id: 2,
                    text: "Second".into(),
                    choices: vec!["c".into(), "d".into()],
                },
            ],
            lesson_id: Some(LessonId::new(9)),
        };
        QuizVm::new(QuizSession::new(quiz, fixed_now()))
    }

    #[test]
    fn confirmation_label_counts_unanswered() {
        let mut vm = vm();
        vm.select(0, 1);
        assert_eq!(
            vm.request_submit(),
            SubmitStep::NeedsConfirmation { remaining: 1 }
        );
        assert_eq!(vm.confirmation_label().as_deref(), Some("1 questions remaining"));
        assert_eq!(vm.answered_label(), "1 of 2 answered");
    }

    #[test]
    fn questions_reflect_selection() {
        let mut vm = vm();
        vm.select(1, 0);
        let questions = vm.questions();
        assert_eq!(questions[1].number, 2);
        assert!(questions[1].choices[0].selected);
        assert!(!questions[0].choices.iter().any(|c| c.selected));
    }

    #[test]
    fn auto_complete_failure_keeps_result() {
        let mut vm = vm();
        vm.select(0, 0);
        vm.select(1, 0);
        vm.request_submit();
        let result = QuizResult {
            score: 100.0,
            passed: true,
            correct: 2,
            total: 2,
            ..QuizResult::default()
        };
        assert_eq!(vm.record_result(result, fixed_now()), Some(LessonId::new(9)));
        vm.set_auto_complete(AutoCompleteStatus::Failed("offline".into()));

        let shown = vm.result().unwrap();
        assert_eq!(shown.score_label, "100%");
        assert_eq!(shown.tally, "2 of 2 correct");
        assert!(vm.auto_complete_notice().unwrap().1);
        assert!(vm.inputs_disabled());
    }
}
