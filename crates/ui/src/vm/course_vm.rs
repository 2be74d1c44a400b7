use course_core::model::{CourseId, LessonId};
use services::CoursePage;

use super::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonRowVm {
    pub id: LessonId,
    pub position: usize,
    pub title: String,
    pub completed: bool,
    pub completed_at_str: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CourseDetailVm {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub meta: Vec<String>,
    pub price_label: String,
    pub premium: bool,
    pub completion_percent: u8,
    pub completion_label: String,
    pub lessons: Vec<LessonRowVm>,
    pub notice: Option<&'static str>,
}

impl CourseDetailVm {
    /// First lesson not yet completed, for the "Continue" button.
    #[must_use]
    pub fn next_up(&self) -> Option<&LessonRowVm> {
        self.lessons.iter().find(|lesson| !lesson.completed)
    }
}

#[must_use]
pub fn map_course_detail(page: &CoursePage) -> CourseDetailVm {
    let course = &page.course;
    let meta = [
        course.difficulty.label().to_string(),
        course.duration.clone(),
        course.category.clone(),
    ]
    .into_iter()
    .filter(|item| !item.is_empty())
    .collect();

    CourseDetailVm {
        id: course.id,
        title: course.title.clone(),
        description: course.description.clone(),
        instructor: course.instructor.clone(),
        meta,
        price_label: course.price_label(),
        premium: course.is_premium(),
        completion_percent: page.completion_percent,
        completion_label: format!(
            "{} of {} lessons complete",
            page.completed_count(),
            page.lessons.len()
        ),
        lessons: page
            .lessons
            .iter()
            .enumerate()
            .map(|(index, lesson)| LessonRowVm {
                id: lesson.id,
                position: index + 1,
                title: lesson.title.clone(),
                completed: lesson.completed,
                completed_at_str: lesson.completed_at.map(format_datetime),
            })
            .collect(),
        notice: page.notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::demo::{demo_course, demo_lessons};
    use course_core::time::fixed_now;

    #[test]
    fn maps_completion_and_next_lesson() {
        let id = CourseId::new(1);
        let mut lessons = demo_lessons(id);
        lessons[0].mark_completed(fixed_now());
        let page = CoursePage {
            course: demo_course(id).unwrap(),
            lessons,
            completion_percent: 33,
            notice: None,
        };

        let vm = map_course_detail(&page);
        assert_eq!(vm.completion_label, "1 of 3 lessons complete");
        assert_eq!(vm.lessons[0].position, 1);
        assert!(vm.lessons[0].completed_at_str.is_some());
        assert_eq!(vm.next_up().map(|l| l.id), Some(LessonId::new(102)));
        assert_eq!(vm.meta, vec!["Beginner", "2h 30m", "Finance"]);
    }
}
