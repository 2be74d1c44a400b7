use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use api::{Backend, InMemoryBackend, MemoryTokenStore, Session};
use course_core::demo::{demo_course, demo_lessons};
use course_core::model::{AuthToken, CourseId, LessonId, Question, Quiz, QuizId};
use course_core::time::fixed_clock;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, SubscriptionService};

use crate::context::{ServicesApp, SignedIn, UiApp, build_app_context};
use crate::views::{
    CatalogView, CourseView, LessonView, NotFoundView, PricingView, ProgressView, QuizView,
    QuizTestHandles,
};
use crate::vm::{QuizIntent, QuizVm};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Catalog,
    Course(u64),
    Lesson(u64),
    Quiz(u64),
    Progress,
    Pricing,
    NotFound(Vec<String>),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<dyn UiApp>,
    view: ViewKind,
    signed_in: bool,
    signed_in_handle: Rc<RefCell<Option<Signal<bool>>>>,
    quiz_handles: Option<QuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app = Arc::clone(&props.app);
    use_context_provider(|| build_app_context(&app));
    let SignedIn(signed_in) = use_context_provider(|| SignedIn(Signal::new(props.signed_in)));
    *props.signed_in_handle.borrow_mut() = Some(signed_in);
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Catalog => rsx! { CatalogView {} },
        ViewKind::Course(course_id) => rsx! { CourseView { course_id } },
        ViewKind::Lesson(lesson_id) => rsx! { LessonView { lesson_id } },
        ViewKind::Quiz(quiz_id) => rsx! { QuizView { quiz_id } },
        ViewKind::Progress => rsx! { ProgressView {} },
        ViewKind::Pricing => rsx! { PricingView {} },
        ViewKind::NotFound(segments) => rsx! { NotFoundView { segments } },
    }
}

/// Free course 1 and premium course 3 with their demo lessons, plus quiz 10
/// on lesson 101 whose answer key is `[0, 1, 2]`.
pub fn seeded_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::new().with_clock(fixed_clock());
    for id in [1, 3] {
        let course_id = CourseId::new(id);
        backend.add_course(demo_course(course_id).expect("demo course"));
        for lesson in demo_lessons(course_id) {
            backend.add_lesson(lesson);
        }
    }
    let quiz = Quiz {
        id: QuizId::new(10),
        title: "Budget basics".into(),
        pass_percent: 60,
        questions: ["Track or plan first?", "Needs share?", "Fund size?"]
            .iter()
            .zip(1_u64..)
            .map(|(text, id)| Question {
                id,
                text: (*text).to_string(),
                choices: vec!["First".into(), "Second".into(), "Third".into()],
            })
            .collect(),
        lesson_id: Some(LessonId::new(101)),
    };
    backend.add_quiz(quiz, vec![0, 1, 2]);
    backend
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
    pub session: Session,
    pub quiz_handles: Option<QuizTestHandles>,
    signed_in: Rc<RefCell<Option<Signal<bool>>>>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work()).await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let spawned work finish and render what it changed.
    pub async fn settle(&mut self) {
        for _ in 0..3 {
            self.drive_async().await;
        }
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Sign out the way the sidebar does: clear the session, then flip the flag.
    pub fn sign_out(&mut self) {
        self.session.sign_out().expect("sign out");
        let mut signed_in = (*self.signed_in.borrow()).expect("signed-in flag provided");
        self.dom.in_runtime(|| signed_in.set(false));
        drive_dom(&mut self.dom);
    }

    pub fn dispatch_quiz(&mut self, intent: QuizIntent) {
        let handles = self.quiz_handles.clone().expect("quiz view harness");
        self.dom.in_runtime(|| handles.dispatch().call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn with_quiz<R>(&self, f: impl FnOnce(&QuizVm) -> R) -> Option<R> {
        let handles = self.quiz_handles.clone().expect("quiz view harness");
        self.dom.in_runtime(|| {
            let vm = handles.vm();
            let guard = vm.read();
            guard.as_ref().map(f)
        })
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, backend: InMemoryBackend, signed_in: bool) -> ViewHarness {
    let session = if signed_in {
        let token = AuthToken::parse("demo-token-1").expect("token");
        Session::load(Arc::new(MemoryTokenStore::with_token(token)))
    } else {
        Session::in_memory()
    };
    let clock = fixed_clock();
    let subscriptions = SubscriptionService::new(
        clock,
        Arc::new(backend.clone()),
        session.clone(),
    )
    .with_processing_delay(Duration::ZERO);
    let services =
        AppServices::from_backend(Backend::from_memory(backend.clone()), session.clone(), clock)
        .with_subscriptions(subscriptions);
    let app: Arc<dyn UiApp> = Arc::new(ServicesApp::new(services, clock));

    let quiz_handles = matches!(view, ViewKind::Quiz(_)).then(QuizTestHandles::default);
    let signed_in_handle = Rc::new(RefCell::new(None));

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            signed_in,
            signed_in_handle: Rc::clone(&signed_in_handle),
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        backend,
        session,
        quiz_handles,
        signed_in: signed_in_handle,
    }
}
