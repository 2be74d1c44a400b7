use course_core::model::{LessonId, QuizId, format_score};
use services::ProgressPage;

use super::time_fmt::format_optional_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedLessonVm {
    pub lesson_id: LessonId,
    pub completed_at_str: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRowVm {
    pub quiz_id: QuizId,
    pub score_label: String,
    pub passed: bool,
    pub answered_label: String,
    pub attempted_at_str: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub lessons_completed: usize,
    pub attempts: usize,
    pub passed_attempts: usize,
    pub best_score: String,
    pub average_score: String,
    pub completed: Vec<CompletedLessonVm>,
    pub attempt_rows: Vec<AttemptRowVm>,
    pub notice: Option<&'static str>,
}

#[must_use]
pub fn map_progress(page: &ProgressPage) -> ProgressVm {
    let summary = page.summary;
    ProgressVm {
        lessons_completed: summary.lessons_completed,
        attempts: summary.attempts,
        passed_attempts: summary.passed_attempts,
        best_score: summary.best_score.map_or_else(|| "—".into(), format_score),
        average_score: summary.average_score.map_or_else(|| "—".into(), format_score),
        completed: page
            .progress
            .lessons_completed
            .iter()
            .map(|item| CompletedLessonVm {
                lesson_id: item.lesson_id,
                completed_at_str: format_optional_datetime(item.completed_at),
            })
            .collect(),
        attempt_rows: page
            .progress
            .quiz_attempts
            .iter()
            .map(|attempt| {
                let answered = attempt.answers.iter().filter(|a| **a >= 0).count();
                AttemptRowVm {
                    quiz_id: attempt.quiz_id,
                    score_label: format_score(attempt.score),
                    passed: attempt.passed,
                    answered_label: format!("{answered}/{} answered", attempt.answers.len()),
                    attempted_at_str: format_optional_datetime(attempt.attempted_at),
                }
            })
            .collect(),
        notice: page.notice,
    }
}
