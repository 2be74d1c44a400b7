use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::lenient;
use crate::model::ids::{AttemptId, LessonId, QuizId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CompletedLesson {
    #[serde(default, deserialize_with = "lenient::id")]
    pub lesson_id: LessonId,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One scored submission of answers against a quiz.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QuizAttemptRecord {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: AttemptId,
    #[serde(default, deserialize_with = "lenient::id")]
    pub quiz_id: QuizId,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub passed: bool,
    #[serde(default, deserialize_with = "lenient::i64_vec")]
    pub answers: Vec<i64>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub attempted_at: Option<DateTime<Utc>>,
}

/// Progress of the signed-in identity.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Progress {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub lessons_completed: Vec<CompletedLesson>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub quiz_attempts: Vec<QuizAttemptRecord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressSummary {
    pub lessons_completed: usize,
    pub attempts: usize,
    pub passed_attempts: usize,
    pub best_score: Option<f64>,
    pub average_score: Option<f64>,
}

impl Progress {
    #[must_use]
    pub fn is_lesson_completed(&self, lesson_id: LessonId) -> bool {
        self.lessons_completed
            .iter()
            .any(|item| item.lesson_id == lesson_id)
    }

    #[must_use]
    pub fn summary(&self) -> ProgressSummary {
        let attempts = self.quiz_attempts.len();
        let passed_attempts = self.quiz_attempts.iter().filter(|a| a.passed).count();
        let best_score = self
            .quiz_attempts
            .iter()
            .map(|a| a.score)
            .fold(None, |best: Option<f64>, score| {
                Some(best.map_or(score, |b| b.max(score)))
            });
        let average_score = if attempts == 0 {
            None
        } else {
            let total: f64 = self.quiz_attempts.iter().map(|a| a.score).sum();
            Some(total / attempts as f64)
        };
        ProgressSummary {
            lessons_completed: self.lessons_completed.len(),
            attempts,
            passed_attempts,
            best_score,
            average_score,
        }
    }
}
