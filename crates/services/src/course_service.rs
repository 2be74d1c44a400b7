use std::sync::Arc;

use api::repository::CourseRepository;
use course_core::demo::{demo_course, demo_lessons};
use course_core::model::{Course, CourseId, Lesson, completion_percent, sort_lessons};

use crate::error::CourseServiceError;

/// Shown when a course page falls back to sample content.
pub const DEMO_COURSE_NOTICE: &str = "Couldn't load this course. Showing sample content.";

/// A course with its ordered lessons.
#[derive(Clone, Debug, PartialEq)]
pub struct CoursePage {
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub completion_percent: u8,
    pub notice: Option<&'static str>,
}

impl CoursePage {
    fn new(course: Course, mut lessons: Vec<Lesson>, notice: Option<&'static str>) -> Self {
        sort_lessons(&mut lessons);
        let completion_percent = completion_percent(&lessons);
        Self {
            course,
            lessons,
            completion_percent,
            notice,
        }
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.lessons.iter().filter(|lesson| lesson.completed).count()
    }
}

#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
}

impl CourseService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Fetch a course and its lessons together.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Api` if either request fails and no demo
    /// course with the same id exists.
    pub async fn load_course(&self, id: CourseId) -> Result<CoursePage, CourseServiceError> {
        let fetched = tokio::try_join!(self.courses.get_course(id), self.courses.list_lessons(id));
        match fetched {
            Ok((course, lessons)) => Ok(CoursePage::new(course, lessons, None)),
            Err(err) if err.is_cancelled() => Err(err.into()),
            Err(err) => match demo_course(id) {
                Some(course) => {
                    log::warn!("course {id} unavailable, showing demo content: {err}");
                    Ok(CoursePage::new(course, demo_lessons(id), Some(DEMO_COURSE_NOTICE)))
                }
                None => Err(err.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::repository::LessonRepository;
    use api::{ApiError, InMemoryBackend};
    use course_core::model::LessonId;

    fn lesson(id: u64, course_id: u64, order: u32) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            course_id: CourseId::new(course_id),
            order_index: order,
            title: format!("Lesson {id}"),
            ..Lesson::default()
        }
    }

    #[tokio::test]
    async fn lessons_are_ordered_and_completion_computed() {
        let backend = InMemoryBackend::new();
        backend.add_course(Course {
            id: CourseId::new(20),
            title: "Live".into(),
            ..Course::default()
        });
        backend.add_lesson(lesson(3, 20, 3));
        backend.add_lesson(lesson(1, 20, 1));
        backend.add_lesson(lesson(2, 20, 2));
        let backend = Arc::new(backend);
        backend.complete_lesson(LessonId::new(1)).await.unwrap();

        let page = CourseService::new(backend).load_course(CourseId::new(20)).await.unwrap();
        let ids: Vec<u64> = page.lessons.iter().map(|l| l.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(page.completion_percent, 33);
        assert_eq!(page.completed_count(), 1);
        assert!(page.notice.is_none());
    }

    #[tokio::test]
    async fn missing_course_uses_demo_when_available() {
        let service = CourseService::new(Arc::new(InMemoryBackend::new()));
        let page = service.load_course(CourseId::new(2)).await.unwrap();
        assert_eq!(page.course.id, CourseId::new(2));
        assert_eq!(page.lessons.len(), 2);
        assert_eq!(page.notice, Some(DEMO_COURSE_NOTICE));
    }

    #[tokio::test]
    async fn missing_course_without_demo_propagates() {
        let service = CourseService::new(Arc::new(InMemoryBackend::new()));
        let err = service.load_course(CourseId::new(77)).await.unwrap_err();
        assert!(matches!(err, CourseServiceError::Api(ApiError::NotFound)));
    }
}
