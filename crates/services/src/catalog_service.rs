use std::collections::BTreeSet;
use std::sync::Arc;

use api::repository::CourseRepository;
use course_core::demo::demo_courses;
use course_core::model::{Course, CourseAccess, Viewer};

/// Category chip that matches every course.
pub const ALL_CATEGORIES: &str = "All";

/// Why the catalog shows sample courses instead of the live list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogNotice {
    Empty,
    Unreachable,
}

impl CatalogNotice {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Empty => "No courses are published yet. Showing sample courses.",
            Self::Unreachable => "Couldn't reach the course server. Showing sample courses.",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogPage {
    pub courses: Vec<Course>,
    pub notice: Option<CatalogNotice>,
}

impl CatalogPage {
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.notice.is_some()
    }
}

/// Loads and filters the course catalog.
#[derive(Clone)]
pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Fetch the live catalog.
    ///
    /// An empty or unreachable catalog is replaced by the demo courses and a
    /// notice; this never fails.
    pub async fn load_catalog(&self) -> CatalogPage {
        match self.courses.list_courses().await {
            Ok(courses) if !courses.is_empty() => CatalogPage {
                courses,
                notice: None,
            },
            Ok(_) => {
                log::info!("catalog is empty; showing demo courses");
                Self::demo(CatalogNotice::Empty)
            }
            Err(err) => {
                log::warn!("catalog unavailable, showing demo courses: {err}");
                Self::demo(CatalogNotice::Unreachable)
            }
        }
    }

    fn demo(notice: CatalogNotice) -> CatalogPage {
        CatalogPage {
            courses: demo_courses(),
            notice: Some(notice),
        }
    }

    /// Courses matching `query` (case-insensitive) within `category`.
    #[must_use]
    pub fn filter(courses: &[Course], query: &str, category: &str) -> Vec<Course> {
        let query = query.trim().to_lowercase();
        courses
            .iter()
            .filter(|course| category == ALL_CATEGORIES || course.category == category)
            .filter(|course| course.matches_query(&query))
            .cloned()
            .collect()
    }

    /// Sorted distinct categories, empty ones skipped.
    #[must_use]
    pub fn categories(courses: &[Course]) -> Vec<String> {
        courses
            .iter()
            .map(|course| course.category.trim())
            .filter(|category| !category.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    #[must_use]
    pub fn access_for(course: &Course, viewer: Viewer) -> CourseAccess {
        course.access_for(viewer)
    }
}
