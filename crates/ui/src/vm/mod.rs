mod catalog_vm;
mod course_vm;
mod lesson_vm;
mod markdown_vm;
mod progress_vm;
mod quiz_vm;
mod time_fmt;

pub use catalog_vm::{CatalogVm, CourseCardVm};
pub use course_vm::{CourseDetailVm, LessonRowVm, map_course_detail};
pub use lesson_vm::{CompletionNotice, LessonVm};
pub use markdown_vm::{excerpt, markdown_to_html, sanitize_html};
pub use progress_vm::{AttemptRowVm, CompletedLessonVm, ProgressVm, map_progress};
pub use quiz_vm::{ChoiceVm, QuestionVm, QuizIntent, QuizResultVm, QuizVm, start_quiz};
pub use time_fmt::{format_datetime, format_optional_datetime};
