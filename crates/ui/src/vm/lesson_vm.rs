use chrono::{DateTime, Utc};
use course_core::model::{CourseId, LessonId, QuizId};
use services::{LessonCompletionError, LessonPage};

use super::markdown_vm::markdown_to_html;

/// Result of the last "Mark complete" press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionNotice {
    Saved,
    SubscriptionRequired,
    SignInRequired,
    Failed,
}

impl CompletionNotice {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Saved => "Lesson marked complete.",
            Self::SubscriptionRequired => "Subscribe to track progress on this lesson.",
            Self::SignInRequired => "Sign in to track your progress.",
            Self::Failed => "Couldn't save your progress. Please try again.",
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Saved)
    }
}

impl From<&LessonCompletionError> for CompletionNotice {
    fn from(err: &LessonCompletionError) -> Self {
        match err {
            LessonCompletionError::SubscriptionRequired => Self::SubscriptionRequired,
            LessonCompletionError::SignInRequired => Self::SignInRequired,
            _ => Self::Failed,
        }
    }
}

/// A lesson page with optimistic completion.
#[derive(Clone, Debug, PartialEq)]
pub struct LessonVm {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub html: String,
    pub quiz_id: Option<QuizId>,
    pub page_notice: Option<&'static str>,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    saving: bool,
    notice: Option<CompletionNotice>,
}

impl LessonVm {
    #[must_use]
    pub fn new(page: &LessonPage) -> Self {
        let lesson = &page.lesson;
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title.clone(),
            html: markdown_to_html(&lesson.content),
            quiz_id: lesson.quiz_id,
            page_notice: page.notice,
            completed: lesson.completed,
            completed_at: lesson.completed_at,
            saving: false,
            notice: None,
        }
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn saving(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub fn notice(&self) -> Option<&CompletionNotice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub fn can_complete(&self) -> bool {
        !self.completed && !self.saving
    }

    /// Flip to completed before the request goes out.
    ///
    /// Returns `false` when already completed or a save is in flight.
    pub fn begin_complete(&mut self, at: DateTime<Utc>) -> bool {
        if !self.can_complete() {
            return false;
        }
        self.completed = true;
        self.completed_at = Some(at);
        self.saving = true;
        self.notice = None;
        true
    }

    /// Apply the outcome of the completion request, rolling back on failure.
    pub fn finish_complete(&mut self, outcome: Result<(), &LessonCompletionError>) {
        if !self.saving {
            return;
        }
        self.saving = false;
        match outcome {
            Ok(()) => self.notice = Some(CompletionNotice::Saved),
            Err(err) => {
                self.completed = false;
                self.completed_at = None;
                self.notice = Some(CompletionNotice::from(err));
            }
        }
    }
}
