use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::lenient;
use crate::model::ids::{AttemptId, LessonId, QuizId};

/// Wire value of an unanswered slot.
pub const UNANSWERED: i64 = -1;

/// Pass threshold used when the API omits one.
pub const DEFAULT_PASS_PERCENT: u32 = 60;

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Question {
    #[serde(default, deserialize_with = "lenient::u64")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub choices: Vec<String>,
}

fn default_pass_percent() -> u32 {
    DEFAULT_PASS_PERCENT
}

fn pass_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(lenient::opt_u32(deserializer)?
        .filter(|value| *value <= 100)
        .unwrap_or(DEFAULT_PASS_PERCENT))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Quiz {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: QuizId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default = "default_pass_percent", deserialize_with = "pass_percent")]
    pub pass_percent: u32,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub questions: Vec<Question>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub lesson_id: Option<LessonId>,
}

impl Quiz {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// Selected choice per question, parallel to the quiz's question list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerSet {
    slots: Vec<Option<u32>>,
}

impl AnswerSet {
    /// All-unanswered set sized to `len` questions.
    #[must_use]
    pub fn unanswered(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Builds a set from wire values; negatives mean unanswered.
    #[must_use]
    pub fn from_wire(values: &[i64]) -> Self {
        Self {
            slots: values
                .iter()
                .map(|value| u32::try_from(*value).ok())
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn get(&self, question: usize) -> Option<u32> {
        self.slots.get(question).copied().flatten()
    }

    /// Records `choice` for `question`. Returns `false` when the index is out of range.
    pub fn select(&mut self, question: usize, choice: u32) -> bool {
        match self.slots.get_mut(question) {
            Some(slot) => {
                *slot = Some(choice);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.len() - self.answered_count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unanswered_count() == 0
    }

    /// Wire form: one entry per question, `-1` for unanswered.
    #[must_use]
    pub fn to_wire(&self) -> Vec<i64> {
        self.slots
            .iter()
            .map(|slot| slot.map_or(UNANSWERED, i64::from))
            .collect()
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Scored outcome of one submission.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QuizResult {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub passed: bool,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub correct: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub total: u32,
    #[serde(default, alias = "next_lesson", deserialize_with = "lenient::opt_id")]
    pub next_lesson_id: Option<LessonId>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub attempt_id: Option<AttemptId>,
}

impl QuizResult {
    /// "80%" or "66.67%".
    #[must_use]
    pub fn score_label(&self) -> String {
        format_score(self.score)
    }
}

/// Formats a percentage, trimming a zero fraction.
#[must_use]
pub fn format_score(score: f64) -> String {
    let rounded = (score * 100.0).round() / 100.0;
    if (rounded - rounded.trunc()).abs() < f64::EPSILON {
        format!("{rounded:.0}%")
    } else {
        format!("{rounded:.2}%")
    }
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GradeError {
    #[error("answer count mismatch: expected {expected}, got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },
}

/// Correct choice per question. Never sent to clients; used by local backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerKey {
    correct: Vec<u32>,
}

impl AnswerKey {
    #[must_use]
    pub fn new(correct: Vec<u32>) -> Self {
        Self { correct }
    }

    /// Scores `answers` the way the course API does: the percentage is rounded to
    /// two decimals and compared against `pass_percent`.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::AnswerCountMismatch` if `answers` is not parallel to the key.
    pub fn grade(&self, pass_percent: u32, answers: &[i64]) -> Result<QuizResult, GradeError> {
        if answers.len() != self.correct.len() {
            return Err(GradeError::AnswerCountMismatch {
                expected: self.correct.len(),
                got: answers.len(),
            });
        }
        let correct = self
            .correct
            .iter()
            .zip(answers)
            .filter(|(key, answer)| i64::from(**key) == **answer)
            .count();
        let total = self.correct.len();
        let score = if total == 0 {
            0.0
        } else {
            let raw = correct as f64 / total as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        };
        Ok(QuizResult {
            score,
            passed: total > 0 && score >= f64::from(pass_percent),
            correct: u32::try_from(correct).unwrap_or(u32::MAX),
            total: u32::try_from(total).unwrap_or(u32::MAX),
            next_lesson_id: None,
            attempt_id: None,
        })
    }
}
