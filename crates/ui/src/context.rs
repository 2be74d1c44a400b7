use std::sync::Arc;

use api::Session;
use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use services::{
    AppServices, AuthService, CatalogService, Clock, CourseService, LessonService,
    ProgressService, QuizLoopService, SubscriptionService,
};

pub trait UiApp: Send + Sync {
    fn session(&self) -> Session;
    fn clock(&self) -> Clock;

    fn catalog(&self) -> Arc<CatalogService>;
    fn courses(&self) -> Arc<CourseService>;
    fn lessons(&self) -> Arc<LessonService>;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn auth(&self) -> Arc<AuthService>;
    fn subscriptions(&self) -> Arc<SubscriptionService>;
}

/// `AppServices` paired with the clock the UI stamps optimistic updates with.
#[derive(Clone)]
pub struct ServicesApp {
    services: AppServices,
    clock: Clock,
}

impl ServicesApp {
    #[must_use]
    pub fn new(services: AppServices, clock: Clock) -> Self {
        Self { services, clock }
    }
}

impl UiApp for ServicesApp {
    fn session(&self) -> Session {
        self.services.session()
    }

    fn clock(&self) -> Clock {
        self.clock
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn courses(&self) -> Arc<CourseService> {
        self.services.courses()
    }

    fn lessons(&self) -> Arc<LessonService> {
        self.services.lessons()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn subscriptions(&self) -> Arc<SubscriptionService> {
        self.services.subscriptions()
    }
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app: Arc::clone(app),
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.app.session()
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.app.clock().now()
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        self.app.catalog()
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        self.app.courses()
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        self.app.lessons()
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.app.quiz_loop()
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        self.app.progress()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        self.app.auth()
    }

    #[must_use]
    pub fn subscriptions(&self) -> Arc<SubscriptionService> {
        self.app.subscriptions()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Reactive sign-in flag shared by the sidebar and the auth views.
#[derive(Clone, Copy)]
pub struct SignedIn(pub Signal<bool>);

/// Provide `SignedIn`, seeded from the session. Call once near the root.
pub fn use_signed_in_provider() -> SignedIn {
    let ctx = use_context::<AppContext>();
    use_context_provider(move || SignedIn(Signal::new(ctx.session().is_signed_in())))
}

#[must_use]
pub fn use_signed_in() -> Signal<bool> {
    use_context::<SignedIn>().0
}
