use std::sync::Arc;

use api::repository::LessonRepository;
use course_core::demo::demo_lesson;
use course_core::model::{Lesson, LessonId};

use crate::error::{LessonCompletionError, LessonServiceError};

pub const DEMO_LESSON_NOTICE: &str = "Couldn't load this lesson. Showing sample content.";

#[derive(Clone, Debug, PartialEq)]
pub struct LessonPage {
    pub lesson: Lesson,
    pub notice: Option<&'static str>,
}

#[derive(Clone)]
pub struct LessonService {
    lessons: Arc<dyn LessonRepository>,
}

impl LessonService {
    #[must_use]
    pub fn new(lessons: Arc<dyn LessonRepository>) -> Self {
        Self { lessons }
    }

    /// Fetch one lesson.
    ///
    /// Transport failures fall back to the matching demo lesson; gate
    /// responses (401/403) and missing lessons are returned as errors.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Api` if the lesson cannot be shown.
    pub async fn load_lesson(&self, id: LessonId) -> Result<LessonPage, LessonServiceError> {
        match self.lessons.get_lesson(id).await {
            Ok(lesson) => Ok(LessonPage {
                lesson,
                notice: None,
            }),
            Err(err) if err.is_forbidden() || err.is_unauthorized() || err.is_cancelled() => {
                Err(err.into())
            }
            Err(err) => match demo_lesson(id) {
                Some(lesson) => {
                    log::warn!("lesson {id} unavailable, showing demo content: {err}");
                    Ok(LessonPage {
                        lesson,
                        notice: Some(DEMO_LESSON_NOTICE),
                    })
                }
                None => Err(err.into()),
            },
        }
    }

    /// Mark a lesson complete for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `LessonCompletionError::SubscriptionRequired` for a 403,
    /// `SignInRequired` for a 401 and `Failed` otherwise.
    pub async fn complete_lesson(&self, id: LessonId) -> Result<(), LessonCompletionError> {
        self.lessons.complete_lesson(id).await.map_err(|err| {
            log::warn!("completing lesson {id} failed: {err}");
            LessonCompletionError::from(err)
        })
    }
}
