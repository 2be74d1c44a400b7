use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::lenient;
use crate::model::ids::{CourseId, LessonId, QuizId};

/// An ordered unit of course content, optionally linked to one quiz.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Lesson {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: LessonId,
    #[serde(default, deserialize_with = "lenient::id")]
    pub course_id: CourseId,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub order_index: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    /// Markdown body.
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub quiz_id: Option<QuizId>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Lesson {
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        if !self.completed {
            self.completed = true;
            self.completed_at = Some(at);
        }
    }

    pub fn mark_incomplete(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}

/// Sort lessons into course order (by order index, then id).
pub fn sort_lessons(lessons: &mut [Lesson]) {
    lessons.sort_by_key(|lesson| (lesson.order_index, lesson.id));
}

/// Percentage of completed lessons, rounded down. Zero when there are none.
#[must_use]
pub fn completion_percent(lessons: &[Lesson]) -> u8 {
    if lessons.is_empty() {
        return 0;
    }
    let done = lessons.iter().filter(|lesson| lesson.completed).count();
    let percent = done * 100 / lessons.len();
    u8::try_from(percent).unwrap_or(100)
}

/// The lesson after `current` in course order, if any.
#[must_use]
pub fn next_lesson(lessons: &[Lesson], current: LessonId) -> Option<&Lesson> {
    let position = lessons.iter().position(|lesson| lesson.id == current)?;
    lessons.get(position + 1)
}
