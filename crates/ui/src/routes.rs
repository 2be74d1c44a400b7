use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::{AppContext, use_signed_in};
use crate::views::{
    CatalogView, CourseView, LessonView, LoginView, NotFoundView, PricingView, ProgressView,
    QuizView, SignupView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CatalogView)] Catalog {},
        #[route("/courses/:course_id", CourseView)] Course { course_id: u64 },
        #[route("/lessons/:lesson_id", LessonView)] Lesson { lesson_id: u64 },
        #[route("/quizzes/:quiz_id", QuizView)] Quiz { quiz_id: u64 },
        #[route("/progress", ProgressView)] Progress {},
        #[route("/pricing", PricingView)] Pricing {},
        #[route("/login", LoginView)] Login {},
        #[route("/signup", SignupView)] Signup {},
    #[end_layout]
    #[route("/:..segments", NotFoundView)] NotFound { segments: Vec<String> },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut signed_in = use_signed_in();

    let sign_out = move |_| {
        ctx.auth().logout();
        signed_in.set(false);
        navigator.push(Route::Catalog {});
    };

    rsx! {
        nav { class: "sidebar",
            h1 { "Courses" }
            ul {
                li { Link { to: Route::Catalog {}, "Catalog" } }
                li { Link { to: Route::Progress {}, "My progress" } }
                li { Link { to: Route::Pricing {}, "Pricing" } }
            }
            div { class: "account",
                if signed_in() {
                    button { class: "button", id: "sign-out", onclick: sign_out, "Sign out" }
                } else {
                    Link { class: "button primary", to: Route::Login {}, "Sign in" }
                    Link { class: "button", to: Route::Signup {}, "Sign up" }
                }
            }
        }
    }
}
