use course_core::model::{Course, CourseAccess, CourseId, Viewer};
use services::{ALL_CATEGORIES, CatalogPage, CatalogService};

use super::markdown_vm::excerpt;

const DESCRIPTION_PREVIEW_CHARS: usize = 120;

#[derive(Clone, Debug, PartialEq)]
pub struct CourseCardVm {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: &'static str,
    pub duration: String,
    pub instructor: String,
    pub price_label: String,
    pub lessons_label: String,
    pub rating_label: Option<String>,
    pub students_label: Option<String>,
    pub premium: bool,
    pub locked: bool,
}

impl CourseCardVm {
    #[must_use]
    pub fn from_course(course: &Course, viewer: Viewer) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: excerpt(&course.description, DESCRIPTION_PREVIEW_CHARS),
            category: course.category.clone(),
            difficulty: course.difficulty.label(),
            duration: course.duration.clone(),
            instructor: course.instructor.clone(),
            price_label: course.price_label(),
            lessons_label: match course.lesson_count {
                1 => "1 lesson".to_string(),
                n => format!("{n} lessons"),
            },
            rating_label: (course.rating > 0.0).then(|| format!("★ {:.1}", course.rating)),
            students_label: (course.students > 0).then(|| format!("{} students", course.students)),
            premium: course.is_premium(),
            locked: CatalogService::access_for(course, viewer) == CourseAccess::RequiresSubscription,
        }
    }
}

/// Loaded catalog plus the viewer it is shown to.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogVm {
    courses: Vec<Course>,
    categories: Vec<String>,
    viewer: Viewer,
    notice: Option<&'static str>,
}

impl CatalogVm {
    #[must_use]
    pub fn new(page: CatalogPage, viewer: Viewer) -> Self {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        categories.extend(CatalogService::categories(&page.courses));
        Self {
            notice: page.notice.map(|notice| notice.message()),
            courses: page.courses,
            categories,
            viewer,
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.courses.len()
    }

    /// Cards for the courses passing the search box and category chip.
    #[must_use]
    pub fn visible(&self, query: &str, category: &str) -> Vec<CourseCardVm> {
        CatalogService::filter(&self.courses, query, category)
            .iter()
            .map(|course| CourseCardVm::from_course(course, self.viewer))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::demo::demo_courses;
    use services::CatalogNotice;

    fn page() -> CatalogPage {
        CatalogPage {
            courses: demo_courses(),
            notice: Some(CatalogNotice::Empty),
        }
    }

    #[test]
    fn categories_start_with_all() {
        let vm = CatalogVm::new(page(), Viewer::anonymous());
        assert_eq!(vm.categories()[0], ALL_CATEGORIES);
        assert!(vm.categories().iter().any(|c| c == "Investing"));
        assert_eq!(vm.notice(), Some(CatalogNotice::Empty.message()));
    }

    #[test]
    fn premium_cards_lock_for_non_subscribers() {
        let anonymous = CatalogVm::new(page(), Viewer::anonymous());
        let locked: Vec<u64> = anonymous
            .visible("", ALL_CATEGORIES)
            .iter()
            .filter(|card| card.locked)
            .map(|card| card.id.value())
            .collect();
        assert_eq!(locked, vec![3, 4]);

        let subscriber = Viewer {
            signed_in: true,
            subscriber: true,
        };
        let vm = CatalogVm::new(page(), subscriber);
        assert!(vm.visible("", ALL_CATEGORIES).iter().all(|card| !card.locked));
    }

    #[test]
    fn visible_applies_query_and_category() {
        let vm = CatalogVm::new(page(), Viewer::anonymous());
        let cards = vm.visible("portfolio", "Investing");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].price_label, "$299.00 / lifetime");
        assert!(vm.visible("portfolio", "Finance").is_empty());
    }
}
