//! Canned catalog shown when the live API is empty or unreachable.

use crate::model::{Course, CourseId, Difficulty, Lesson, LessonId, PricingTier};

/// Number of courses in the fallback catalog.
pub const DEMO_COURSE_COUNT: usize = 4;

struct DemoCourse {
    id: u64,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    duration: &'static str,
    difficulty: Difficulty,
    instructor: &'static str,
    premium: bool,
    price_cents: u64,
    rating: f64,
    students: u32,
    lessons: &'static [(&'static str, &'static str)],
}

const DEMO_COURSES: [DemoCourse; DEMO_COURSE_COUNT] = [
    DemoCourse {
        id: 1,
        title: "Personal Finance Foundations",
        description: "Budgeting, saving and building an emergency fund.",
        category: "Finance",
        duration: "2h 30m",
        difficulty: Difficulty::Beginner,
        instructor: "Maya Lindqvist",
        premium: false,
        price_cents: 0,
        rating: 4.7,
        students: 1_284,
        lessons: &[
            (
                "Why budgets fail",
                "## Why budgets fail\n\nMost budgets fail because they are **too strict**.\n\n- Track first\n- Plan second",
            ),
            (
                "The 50/30/20 rule",
                "## The 50/30/20 rule\n\nSplit take-home pay into *needs*, *wants* and *savings*.",
            ),
            (
                "Emergency funds",
                "## Emergency funds\n\nAim for three to six months of essential expenses.",
            ),
        ],
    },
    DemoCourse {
        id: 2,
        title: "Stock Market Basics",
        description: "How exchanges, orders and indexes actually work.",
        category: "Investing",
        duration: "3h 10m",
        difficulty: Difficulty::Beginner,
        instructor: "Daniel Okafor",
        premium: false,
        price_cents: 0,
        rating: 4.6,
        students: 2_031,
        lessons: &[
            (
                "What is a stock?",
                "## What is a stock?\n\nA share is a claim on a company's future earnings.",
            ),
            (
                "Placing orders",
                "## Placing orders\n\nMarket orders fill fast; limit orders fill at your price or better.",
            ),
        ],
    },
    DemoCourse {
        id: 3,
        title: "Options Trading Strategies",
        description: "Calls, puts, spreads and managing risk with options.",
        category: "Trading",
        duration: "5h 45m",
        difficulty: Difficulty::Advanced,
        instructor: "Priya Raman",
        premium: true,
        price_cents: 49_900,
        rating: 4.8,
        students: 642,
        lessons: &[
            (
                "Calls and puts",
                "## Calls and puts\n\nA call is the right to buy; a put is the right to sell.",
            ),
            (
                "Vertical spreads",
                "## Vertical spreads\n\nCombine two options to cap both risk and reward.",
            ),
        ],
    },
    DemoCourse {
        id: 4,
        title: "Portfolio Management",
        description: "Asset allocation, rebalancing and risk-adjusted returns.",
        category: "Investing",
        duration: "4h 20m",
        difficulty: Difficulty::Intermediate,
        instructor: "Tomás Herrera",
        premium: true,
        price_cents: 29_900,
        rating: 4.5,
        students: 877,
        lessons: &[
            (
                "Asset allocation",
                "## Asset allocation\n\nYour mix of assets drives most of your long-run return.",
            ),
            (
                "Rebalancing",
                "## Rebalancing\n\nRebalance when allocations drift significantly from target.",
            ),
        ],
    },
];

fn build_course(demo: &DemoCourse) -> Course {
    Course {
        id: CourseId::new(demo.id),
        title: demo.title.to_string(),
        description: demo.description.to_string(),
        category: demo.category.to_string(),
        lesson_count: u32::try_from(demo.lessons.len()).unwrap_or_default(),
        duration: demo.duration.to_string(),
        difficulty: demo.difficulty,
        instructor: demo.instructor.to_string(),
        pricing_tier: if demo.premium {
            PricingTier::Premium
        } else {
            PricingTier::Free
        },
        is_premium: demo.premium,
        price_cents: demo.price_cents,
        billing: demo.premium.then(|| "lifetime".to_string()),
        rating: demo.rating,
        students: demo.students,
        completion_rate: 0.0,
    }
}

/// The fallback catalog.
#[must_use]
pub fn demo_courses() -> Vec<Course> {
    DEMO_COURSES.iter().map(build_course).collect()
}

#[must_use]
pub fn demo_course(id: CourseId) -> Option<Course> {
    DEMO_COURSES
        .iter()
        .find(|demo| demo.id == id.value())
        .map(build_course)
}

/// Lessons of a demo course, in order. Lesson ids are `course_id * 100 + position`.
#[must_use]
pub fn demo_lessons(id: CourseId) -> Vec<Lesson> {
    let Some(demo) = DEMO_COURSES.iter().find(|demo| demo.id == id.value()) else {
        return Vec::new();
    };
    demo.lessons
        .iter()
        .zip(1_u32..)
        .map(|((title, content), position)| Lesson {
            id: LessonId::new(demo.id * 100 + u64::from(position)),
            course_id: id,
            order_index: position,
            title: (*title).to_string(),
            content: (*content).to_string(),
            quiz_id: None,
            completed: false,
            completed_at: None,
        })
        .collect()
}

/// A single demo lesson, looked up by its id.
#[must_use]
pub fn demo_lesson(id: LessonId) -> Option<Lesson> {
    let course_id = CourseId::new(id.value() / 100);
    demo_lessons(course_id)
        .into_iter()
        .find(|lesson| lesson.id == id)
}
