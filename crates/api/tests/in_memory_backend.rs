use api::repository::{
    AccountRepository, AuthRepository, CourseRepository, LessonRepository, LoginRequest,
    ProgressRepository, QuizRepository, SignupRequest,
};
use api::{ApiError, FailureKind, InMemoryBackend, Operation};
use course_core::demo::{demo_course, demo_lessons};
use course_core::model::{AnswerSet, CourseId, LessonId, Question, Quiz, QuizId};
use course_core::time::{fixed_clock, fixed_now};

fn quiz(id: u64, lesson_id: u64, questions: usize) -> Quiz {
    Quiz {
        id: QuizId::new(id),
        title: format!("Quiz {id}"),
        pass_percent: 60,
        questions: (0..questions)
            .map(|index| Question {
                id: index as u64 + 1,
                text: format!("Question {}", index + 1),
                choices: vec!["a".into(), "b".into(), "c".into()],
            })
            .collect(),
        lesson_id: Some(LessonId::new(lesson_id)),
    }
}

/// Free course 1 and premium course 3 with their demo lessons, plus a quiz on lesson 101.
fn seeded() -> InMemoryBackend {
    let backend = InMemoryBackend::new().with_clock(fixed_clock());
    for id in [1, 3] {
        let course_id = CourseId::new(id);
        backend.add_course(demo_course(course_id).expect("demo course"));
        for lesson in demo_lessons(course_id) {
            backend.add_lesson(lesson);
        }
    }
    backend.add_quiz(quiz(10, 101, 3), vec![0, 1, 2]);
    backend
}

#[tokio::test]
async fn lists_lessons_in_order_without_quiz_links() {
    let backend = seeded();
    let lessons = backend.list_lessons(CourseId::new(1)).await.unwrap();
    let ids: Vec<u64> = lessons.iter().map(|lesson| lesson.id.value()).collect();
    assert_eq!(ids, vec![101, 102, 103]);
    assert!(lessons.iter().all(|lesson| lesson.quiz_id.is_none()));
    assert!(lessons.iter().all(|lesson| !lesson.completed));

    // Only the single-lesson read resolves the linked quiz.
    let lesson = backend.get_lesson(LessonId::new(101)).await.unwrap();
    assert_eq!(lesson.quiz_id, Some(QuizId::new(10)));
}

#[tokio::test]
async fn unknown_course_is_not_found() {
    let backend = seeded();
    let err = backend.get_course(CourseId::new(42)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    let err = backend.list_lessons(CourseId::new(42)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn lessons_after_the_first_are_gated() {
    let backend = seeded();
    assert!(backend.get_lesson(LessonId::new(301)).await.is_ok());

    let err = backend.get_lesson(LessonId::new(302)).await.unwrap_err();
    assert!(err.is_forbidden());
    assert_eq!(err.to_string(), "forbidden: Subscribe to access this lesson");

    backend.set_subscriber(true);
    assert!(backend.get_lesson(LessonId::new(302)).await.is_ok());
}

#[tokio::test]
async fn free_course_lessons_after_the_first_are_gated() {
    let backend = seeded();
    assert!(backend.get_lesson(LessonId::new(101)).await.is_ok());
    for id in [102, 103] {
        let err = backend.get_lesson(LessonId::new(id)).await.unwrap_err();
        assert!(err.is_forbidden(), "lesson {id} should be gated");
    }

    backend.set_subscriber(true);
    assert!(backend.get_lesson(LessonId::new(103)).await.is_ok());
}

#[tokio::test]
async fn completion_is_idempotent() {
    let backend = seeded();
    backend.complete_lesson(LessonId::new(101)).await.unwrap();
    backend.complete_lesson(LessonId::new(101)).await.unwrap();

    let progress = backend.get_progress().await.unwrap();
    assert_eq!(progress.lessons_completed.len(), 1);
    assert_eq!(progress.lessons_completed[0].completed_at, Some(fixed_now()));

    let lesson = backend.get_lesson(LessonId::new(101)).await.unwrap();
    assert!(lesson.completed);
    assert!(backend.is_completed(LessonId::new(101)));
}

#[tokio::test]
async fn quizzes_require_subscription() {
    let backend = seeded();
    let err = backend.get_quiz(QuizId::new(10)).await.unwrap_err();
    assert!(err.is_forbidden());

    backend.set_subscriber(true);
    let quiz = backend.get_quiz(QuizId::new(10)).await.unwrap();
    assert_eq!(quiz.question_count(), 3);
}

#[tokio::test]
async fn submission_is_graded_and_recorded_newest_first() {
    let backend = seeded();

    let first = backend
        .submit_quiz(QuizId::new(10), &AnswerSet::from_wire(&[0, 1, -1]))
        .await
        .unwrap();
    assert_eq!(first.correct, 2);
    assert!(first.passed);
    assert_eq!(first.next_lesson_id, Some(LessonId::new(102)));

    let second = backend
        .submit_quiz(QuizId::new(10), &AnswerSet::from_wire(&[2, 2, 2]))
        .await
        .unwrap();
    assert!(!second.passed);

    let attempts = backend.get_progress().await.unwrap().quiz_attempts;
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].answers, vec![2, 2, 2]);
    assert_eq!(attempts[1].answers, vec![0, 1, -1]);
    assert_eq!(Some(attempts[0].id), second.attempt_id);
}

#[tokio::test]
async fn submission_with_wrong_length_is_rejected() {
    let backend = seeded();
    let err = backend
        .submit_quiz(QuizId::new(10), &AnswerSet::unanswered(2))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(detail) if detail == "Answer count mismatch"));
    assert!(backend.attempts().is_empty());
}

#[tokio::test]
async fn signup_then_login_issues_demo_tokens() {
    let backend = InMemoryBackend::new();
    let token = backend
        .signup(&SignupRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    assert_eq!(token.as_str(), "demo-token-1");

    let duplicate = backend
        .signup(&SignupRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "other12".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, ApiError::BadRequest(detail) if detail == "Email already registered"));

    let login = backend
        .login(&LoginRequest {
            username: "ada@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    assert_eq!(login.as_str(), "demo-token-1");

    let bad = backend
        .login(&LoginRequest {
            username: "ada@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert!(bad.is_unauthorized());
}

#[tokio::test]
async fn subscribe_flips_profile_flag() {
    let backend = InMemoryBackend::new();
    backend.register_user("demo@test.com", "password", Some("Demo"));
    assert!(!backend.current_user().await.unwrap().is_subscriber);

    backend.subscribe("yearly").await.unwrap();
    assert!(backend.current_user().await.unwrap().is_subscriber);
    assert_eq!(backend.subscribed_plan().as_deref(), Some("yearly"));
}

#[tokio::test]
async fn injected_failures_apply_until_recovered() {
    let backend = seeded();
    backend.fail(Operation::ListCourses, FailureKind::Unavailable);
    assert!(backend.list_courses().await.is_err());

    backend.recover(Operation::ListCourses);
    assert_eq!(backend.list_courses().await.unwrap().len(), 2);
    assert_eq!(backend.calls(Operation::ListCourses), 2);
}
