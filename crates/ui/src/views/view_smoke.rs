use api::repository::LessonRepository;
use api::{FailureKind, InMemoryBackend, Operation};
use course_core::model::{LessonId, QuizId};
use services::QuizPhase;

use super::test_harness::{ViewKind, seeded_backend, setup_view_harness};
use crate::vm::{QuizIntent, QuizVm};

#[tokio::test(flavor = "current_thread")]
async fn catalog_falls_back_to_sample_courses_when_empty() {
    let mut harness = setup_view_harness(ViewKind::Catalog, InMemoryBackend::new(), false);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("No courses are published yet. Showing sample courses."),
        "missing demo notice in {html}"
    );
    assert!(html.contains("Personal Finance Foundations"), "missing course in {html}");
    assert!(html.contains("Subscribe to unlock"), "missing premium lock in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_reports_unreachable_server() {
    let backend = seeded_backend();
    backend.fail(Operation::ListCourses, FailureKind::Unavailable);
    let mut harness = setup_view_harness(ViewKind::Catalog, backend, false);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("reach the course server"), "missing notice in {html}");
    assert!(html.contains("Portfolio Management"), "missing sample course in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_lists_published_courses() {
    let mut harness = setup_view_harness(ViewKind::Catalog, seeded_backend(), true);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Options Trading Strategies"), "missing course in {html}");
    assert!(!html.contains("Showing sample courses"), "unexpected notice in {html}");
    assert!(!html.contains("Stock Market Basics"), "unpublished course in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_view_shows_lessons_and_completion() {
    let backend = seeded_backend();
    backend
        .complete_lesson(LessonId::new(101))
        .await
        .expect("complete lesson");
    let mut harness = setup_view_harness(ViewKind::Course(1), backend, true);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Personal Finance Foundations"), "missing title in {html}");
    assert!(html.contains("1 of 3 lessons complete"), "missing completion in {html}");
    assert!(html.contains("33%"), "missing percent in {html}");
    assert!(html.contains("Continue: The 50/30/20 rule"), "missing next up in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_renders_markdown_body() {
    let mut harness = setup_view_harness(ViewKind::Lesson(101), seeded_backend(), true);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("<h2>Why budgets fail</h2>"), "missing body in {html}");
    assert!(html.contains("Mark complete"), "missing action in {html}");
    assert!(html.contains("Take the quiz"), "missing quiz link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn premium_lesson_shows_paywall() {
    let mut harness = setup_view_harness(ViewKind::Lesson(302), seeded_backend(), true);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Premium lesson"), "missing paywall in {html}");
    assert!(
        html.contains("This content is available to subscribers."),
        "missing message in {html}"
    );
    assert!(!html.contains("Mark complete"), "lesson body leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_without_subscription_shows_paywall() {
    let mut harness = setup_view_harness(ViewKind::Quiz(10), seeded_backend(), true);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quizzes are for subscribers"), "missing paywall in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn incomplete_quiz_asks_for_confirmation_once() {
    let backend = seeded_backend();
    backend.set_subscriber(true);
    let mut harness = setup_view_harness(ViewKind::Quiz(10), backend, true);
    harness.rebuild();
    harness.settle().await;
    assert!(harness.render().contains("Budget basics"));

    harness.dispatch_quiz(QuizIntent::Select {
        question: 0,
        choice: 0,
    });
    harness.dispatch_quiz(QuizIntent::Submit);
    let html = harness.render();
    assert!(html.contains("2 questions remaining"), "missing dialog in {html}");
    assert_eq!(harness.backend.calls(Operation::SubmitQuiz), 0);

    harness.dispatch_quiz(QuizIntent::CancelConfirm);
    let html = harness.render();
    assert!(!html.contains("questions remaining"), "dialog still open in {html}");

    harness.dispatch_quiz(QuizIntent::Submit);
    harness.dispatch_quiz(QuizIntent::Confirm);
    harness.settle().await;

    assert_eq!(harness.backend.calls(Operation::SubmitQuiz), 1);
    let html = harness.render();
    assert!(html.contains("Not passed yet"), "missing result in {html}");
    assert!(html.contains("1 of 3 correct"), "missing tally in {html}");
    assert_eq!(harness.backend.attempts()[0].answers, vec![0, -1, -1]);
    assert!(!harness.backend.is_completed(LessonId::new(101)));
}

#[tokio::test(flavor = "current_thread")]
async fn passing_quiz_completes_the_linked_lesson() {
    let backend = seeded_backend();
    backend.set_subscriber(true);
    let mut harness = setup_view_harness(ViewKind::Quiz(10), backend, true);
    harness.rebuild();
    harness.settle().await;

    for (question, choice) in [(0, 0), (1, 1), (2, 2)] {
        harness.dispatch_quiz(QuizIntent::Select { question, choice });
    }
    harness.dispatch_quiz(QuizIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Passed"), "missing result in {html}");
    assert!(html.contains("100%"), "missing score in {html}");
    assert!(html.contains("Lesson marked complete."), "missing notice in {html}");
    assert!(html.contains("Next lesson"), "missing next link in {html}");
    assert!(harness.backend.is_completed(LessonId::new(101)));
    assert_eq!(
        harness.with_quiz(|quiz| (quiz.quiz_id(), quiz.phase())),
        Some((QuizId::new(10), QuizPhase::Result))
    );

    // Choices stay locked until the learner starts over.
    harness.dispatch_quiz(QuizIntent::Select {
        question: 0,
        choice: 2,
    });
    assert_eq!(
        harness.with_quiz(QuizVm::answered_label).as_deref(),
        Some("3 of 3 answered")
    );
    harness.dispatch_quiz(QuizIntent::Reset);
    assert_eq!(
        harness.with_quiz(QuizVm::answered_label).as_deref(),
        Some("0 of 3 answered")
    );
}

#[tokio::test(flavor = "current_thread")]
async fn failed_submission_keeps_answers() {
    let backend = seeded_backend();
    backend.set_subscriber(true);
    backend.fail(Operation::SubmitQuiz, FailureKind::Unavailable);
    let mut harness = setup_view_harness(ViewKind::Quiz(10), backend, true);
    harness.rebuild();
    harness.settle().await;

    for (question, choice) in [(0, 0), (1, 0), (2, 0)] {
        harness.dispatch_quiz(QuizIntent::Select { question, choice });
    }
    harness.dispatch_quiz(QuizIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("submit your answers"), "missing error in {html}");
    assert_eq!(
        harness.with_quiz(|quiz| (quiz.phase(), quiz.answered_label())),
        Some((QuizPhase::Ready, "3 of 3 answered".to_string()))
    );
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_summarizes_attempts() {
    let backend = seeded_backend();
    backend
        .complete_lesson(LessonId::new(102))
        .await
        .expect("complete lesson");
    let mut harness = setup_view_harness(ViewKind::Progress, backend, true);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Lessons completed"), "missing stats in {html}");
    assert!(html.contains("Lesson 102"), "missing completed lesson in {html}");
    assert!(html.contains("No quiz attempts yet."), "missing empty attempts in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_asks_signed_out_users_to_sign_in() {
    let backend = seeded_backend();
    backend.fail(Operation::GetProgress, FailureKind::Unauthorized);
    let mut harness = setup_view_harness(ViewKind::Progress, backend, false);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Sign in to track your progress."), "missing notice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn pricing_lists_plans_and_requires_account() {
    let mut harness = setup_view_harness(ViewKind::Pricing, seeded_backend(), false);
    harness.rebuild();
    let html = harness.render();
    for name in ["Monthly", "Yearly", "Lifetime"] {
        assert!(html.contains(&format!("Choose {name}")), "missing {name} in {html}");
    }
    assert!(html.contains("need an account to subscribe"), "missing notice in {html}");
    assert!(html.contains("disabled"), "plans should be disabled in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_path_renders_not_found() {
    let view = ViewKind::NotFound(vec!["courses".into(), "nope".into()]);
    let mut harness = setup_view_harness(view, seeded_backend(), false);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Page not found"), "missing heading in {html}");
    assert!(html.contains("/courses/nope"), "missing path in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_relocks_premium_courses_after_sign_out() {
    let backend = seeded_backend();
    backend.set_subscriber(true);
    let mut harness = setup_view_harness(ViewKind::Catalog, backend, true);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Options Trading Strategies"), "missing course in {html}");
    assert!(!html.contains("Subscribe to unlock"), "subscriber sees a lock in {html}");

    harness.sign_out();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Subscribe to unlock"), "lock missing after sign-out in {html}");
    assert_eq!(harness.backend.calls(Operation::ListCourses), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn course_rows_link_lessons_only() {
    let mut harness = setup_view_harness(ViewKind::Course(1), seeded_backend(), true);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("The 50/30/20 rule"), "missing lesson in {html}");
    assert!(!html.contains("/quizzes/"), "lesson list should not link quizzes in {html}");
}
