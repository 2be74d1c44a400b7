//! In-memory backend for tests and offline prototyping.
//!
//! Mirrors the REST API's observable rules: lessons past the first one of any
//! course and all quizzes are gated for non-subscribers, lesson lists carry no
//! quiz links, submissions are graded against a stored answer key, completion
//! is idempotent.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_core::Clock;
use course_core::model::{
    AnswerKey, AnswerSet, AttemptId, AuthToken, CompletedLesson, Course, CourseId, GradeError,
    Lesson, LessonId, Progress, Quiz, QuizAttemptRecord, QuizId, QuizResult, UserProfile,
    next_lesson, sort_lessons,
};

use crate::error::ApiError;
use crate::repository::{
    AccountRepository, AuthRepository, CourseRepository, LessonRepository, LoginRequest,
    ProgressRepository, QuizRepository, SignupRequest,
};

/// Backend calls that can be made to fail on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    ListCourses,
    GetCourse,
    ListLessons,
    GetLesson,
    CompleteLesson,
    GetQuiz,
    SubmitQuiz,
    GetProgress,
    Login,
    Signup,
    CurrentUser,
    Subscribe,
}

/// Failure to inject for an `Operation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Unavailable,
    Unauthorized,
    Forbidden(String),
    Status(u16),
}

impl FailureKind {
    fn to_error(&self) -> ApiError {
        match self {
            Self::Unavailable => ApiError::Unavailable("injected failure".into()),
            Self::Unauthorized => ApiError::Unauthorized,
            Self::Forbidden(detail) => ApiError::Forbidden(detail.clone()),
            Self::Status(code) => ApiError::Status(*code),
        }
    }
}

struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
struct State {
    courses: BTreeMap<CourseId, Course>,
    lessons: BTreeMap<LessonId, Lesson>,
    quizzes: BTreeMap<QuizId, (Quiz, AnswerKey)>,
    completed: BTreeMap<LessonId, DateTime<Utc>>,
    attempts: Vec<QuizAttemptRecord>,
    accounts: Vec<Account>,
    subscriber: bool,
    plan: Option<String>,
    failures: HashMap<Operation, FailureKind>,
    calls: HashMap<Operation, usize>,
}

#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
    clock: Clock,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call and return the injected failure, if any.
    fn enter(&self, op: Operation) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.state();
        *state.calls.entry(op).or_default() += 1;
        match state.failures.get(&op) {
            Some(kind) => Err(kind.to_error()),
            None => Ok(state),
        }
    }

    pub fn add_course(&self, course: Course) {
        self.state().courses.insert(course.id, course);
    }

    pub fn add_lesson(&self, lesson: Lesson) {
        self.state().lessons.insert(lesson.id, lesson);
    }

    /// Store a quiz with its answer key (one correct choice per question).
    pub fn add_quiz(&self, quiz: Quiz, correct: Vec<u32>) {
        self.state()
            .quizzes
            .insert(quiz.id, (quiz, AnswerKey::new(correct)));
    }

    /// Register an account that `login` will accept.
    pub fn register_user(&self, email: &str, password: &str, name: Option<&str>) {
        let mut state = self.state();
        let id = state.accounts.len() as u64 + 1;
        state.accounts.push(Account {
            profile: UserProfile {
                id,
                email: email.to_string(),
                name: name.map(str::to_owned),
                is_subscriber: false,
            },
            password: password.to_string(),
        });
    }

    pub fn set_subscriber(&self, subscriber: bool) {
        self.state().subscriber = subscriber;
    }

    pub fn fail(&self, op: Operation, kind: FailureKind) {
        self.state().failures.insert(op, kind);
    }

    pub fn recover(&self, op: Operation) {
        self.state().failures.remove(&op);
    }

    /// How many times `op` has been called, failed calls included.
    #[must_use]
    pub fn calls(&self, op: Operation) -> usize {
        self.state().calls.get(&op).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_completed(&self, lesson_id: LessonId) -> bool {
        self.state().completed.contains_key(&lesson_id)
    }

    #[must_use]
    pub fn attempts(&self) -> Vec<QuizAttemptRecord> {
        self.state().attempts.clone()
    }

    #[must_use]
    pub fn subscribed_plan(&self) -> Option<String> {
        self.state().plan.clone()
    }
}

impl State {
    fn course_lessons(&self, course_id: CourseId) -> Vec<Lesson> {
        let mut lessons: Vec<Lesson> = self
            .lessons
            .values()
            .filter(|lesson| lesson.course_id == course_id)
            .map(|lesson| {
                let mut lesson = self.with_progress(lesson.clone());
                lesson.quiz_id = None;
                lesson
            })
            .collect();
        sort_lessons(&mut lessons);
        lessons
    }

    fn with_progress(&self, mut lesson: Lesson) -> Lesson {
        match self.completed.get(&lesson.id) {
            Some(at) => {
                lesson.completed = true;
                lesson.completed_at = Some(*at);
            }
            None => lesson.mark_incomplete(),
        }
        lesson
    }

    /// Single-lesson reads resolve the quiz linked to the lesson.
    fn with_quiz(&self, mut lesson: Lesson) -> Lesson {
        if lesson.quiz_id.is_none() {
            lesson.quiz_id = self
                .quizzes
                .values()
                .find(|(quiz, _)| quiz.lesson_id == Some(lesson.id))
                .map(|(quiz, _)| quiz.id);
        }
        lesson
    }

    fn token_for(profile: &UserProfile) -> Result<AuthToken, ApiError> {
        AuthToken::parse(format!("demo-token-{}", profile.id))
            .ok_or_else(|| ApiError::Decode("empty token".into()))
    }
}

#[async_trait]
impl CourseRepository for InMemoryBackend {
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let state = self.enter(Operation::ListCourses)?;
        Ok(state.courses.values().cloned().collect())
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let state = self.enter(Operation::GetCourse)?;
        state.courses.get(&id).cloned().ok_or(ApiError::NotFound)
    }

    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, ApiError> {
        let state = self.enter(Operation::ListLessons)?;
        if !state.courses.contains_key(&course_id) {
            return Err(ApiError::NotFound);
        }
        Ok(state.course_lessons(course_id))
    }
}

#[async_trait]
impl LessonRepository for InMemoryBackend {
    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        let state = self.enter(Operation::GetLesson)?;
        let lesson = state.lessons.get(&id).cloned().ok_or(ApiError::NotFound)?;
        if !state.subscriber {
            let first = state
                .course_lessons(lesson.course_id)
                .first()
                .map(|first| first.id);
            if first != Some(lesson.id) {
                return Err(ApiError::Forbidden("Subscribe to access this lesson".into()));
            }
        }
        Ok(state.with_quiz(state.with_progress(lesson)))
    }

    async fn complete_lesson(&self, id: LessonId) -> Result<(), ApiError> {
        let mut state = self.enter(Operation::CompleteLesson)?;
        if !state.lessons.contains_key(&id) {
            return Err(ApiError::NotFound);
        }
        let now = self.clock.now();
        state.completed.entry(id).or_insert(now);
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for InMemoryBackend {
    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, ApiError> {
        let state = self.enter(Operation::GetQuiz)?;
        let (quiz, _) = state.quizzes.get(&id).ok_or(ApiError::NotFound)?;
        if !state.subscriber {
            return Err(ApiError::Forbidden("Subscribe to access quizzes".into()));
        }
        Ok(quiz.clone())
    }

    async fn submit_quiz(&self, id: QuizId, answers: &AnswerSet) -> Result<QuizResult, ApiError> {
        let mut state = self.enter(Operation::SubmitQuiz)?;
        let (quiz, key) = state.quizzes.get(&id).ok_or(ApiError::NotFound)?;
        let wire = answers.to_wire();
        let mut result = key
            .grade(quiz.pass_percent, &wire)
            .map_err(|err| match err {
                GradeError::AnswerCountMismatch { .. } => {
                    ApiError::BadRequest("Answer count mismatch".into())
                }
                other => ApiError::BadRequest(other.to_string()),
            })?;

        if let Some(lesson_id) = quiz.lesson_id {
            if let Some(lesson) = state.lessons.get(&lesson_id) {
                let lessons = state.course_lessons(lesson.course_id);
                result.next_lesson_id = next_lesson(&lessons, lesson_id).map(|next| next.id);
            }
        }

        let attempt_id = AttemptId::new(state.attempts.len() as u64 + 1);
        result.attempt_id = Some(attempt_id);
        let record = QuizAttemptRecord {
            id: attempt_id,
            quiz_id: id,
            score: result.score,
            passed: result.passed,
            answers: wire,
            attempted_at: Some(self.clock.now()),
        };
        // Newest first, as the progress endpoint orders them.
        state.attempts.insert(0, record);
        Ok(result)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryBackend {
    async fn get_progress(&self) -> Result<Progress, ApiError> {
        let state = self.enter(Operation::GetProgress)?;
        Ok(Progress {
            lessons_completed: state
                .completed
                .iter()
                .map(|(lesson_id, at)| CompletedLesson {
                    lesson_id: *lesson_id,
                    completed_at: Some(*at),
                })
                .collect(),
            quiz_attempts: state.attempts.clone(),
        })
    }
}

#[async_trait]
impl AuthRepository for InMemoryBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, ApiError> {
        let state = self.enter(Operation::Login)?;
        let account = state
            .accounts
            .iter()
            .find(|account| {
                account.profile.email == request.username && account.password == request.password
            })
            .ok_or(ApiError::Unauthorized)?;
        State::token_for(&account.profile)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthToken, ApiError> {
        let mut state = self.enter(Operation::Signup)?;
        if state
            .accounts
            .iter()
            .any(|account| account.profile.email == request.email)
        {
            return Err(ApiError::BadRequest("Email already registered".into()));
        }
        let profile = UserProfile {
            id: state.accounts.len() as u64 + 1,
            email: request.email.clone(),
            name: Some(request.name.clone()).filter(|name| !name.trim().is_empty()),
            is_subscriber: false,
        };
        let token = State::token_for(&profile)?;
        state.accounts.push(Account {
            profile,
            password: request.password.clone(),
        });
        Ok(token)
    }
}

#[async_trait]
impl AccountRepository for InMemoryBackend {
    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let state = self.enter(Operation::CurrentUser)?;
        let mut profile = state
            .accounts
            .first()
            .map(|account| account.profile.clone())
            .unwrap_or_else(|| UserProfile {
                id: 1,
                email: "demo@test.com".into(),
                name: Some("Demo User".into()),
                is_subscriber: false,
            });
        profile.is_subscriber = state.subscriber;
        Ok(profile)
    }

    async fn subscribe(&self, plan_id: &str) -> Result<(), ApiError> {
        let mut state = self.enter(Operation::Subscribe)?;
        state.subscriber = true;
        state.plan = Some(plan_id.to_string());
        Ok(())
    }
}
