use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::LessonId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, use_cancel_signal, view_state_from_resource};
use crate::vm::{LessonVm, format_datetime};

#[component]
pub fn LessonView(lesson_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let lessons = ctx.lessons();
    let cancel = use_cancel_signal();
    let vm = use_signal(|| None::<LessonVm>);

    let resource = {
        let lessons = lessons.clone();
        let cancel = cancel.clone();
        use_resource(use_reactive((&lesson_id,), move |(lesson_id,)| {
            let lessons = lessons.clone();
            let cancel = cancel.clone();
            let mut vm = vm;
            async move {
                let page = cancel
                    .guard(lessons.load_lesson(LessonId::new(lesson_id)))
                    .await
                    .map_err(|_| ViewError::Unknown)?
                    .map_err(|err| ViewError::from_service(&err))?;
                vm.set(Some(LessonVm::new(&page)));
                Ok::<_, ViewError>(())
            }
        }))
    };

    let mark_complete = use_callback(move |()| {
        let mut vm = vm;
        let at = ctx.now();
        let started = vm
            .write()
            .as_mut()
            .and_then(|lesson| lesson.begin_complete(at).then_some(lesson.id));
        let Some(id) = started else {
            return;
        };
        let lessons = lessons.clone();
        let cancel = cancel.clone();
        spawn(async move {
            let Ok(outcome) = cancel.guard(lessons.complete_lesson(id)).await else {
                return;
            };
            if let Some(lesson) = vm.write().as_mut() {
                lesson.finish_complete(outcome.as_ref().copied());
            }
        });
    });

    let state = view_state_from_resource(&resource);
    let current = vm.read().clone();

    rsx! {
        div { class: "page lesson",
            match (state, current) {
                (ViewState::Error(err @ ViewError::SubscriptionRequired), _) => rsx! {
                    div { class: "paywall",
                        h2 { "Premium lesson" }
                        p { "{err.message()}" }
                        Link { class: "button primary", to: Route::Pricing {}, "See plans" }
                    }
                },
                (ViewState::Error(err @ ViewError::SignInRequired), _) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { class: "button primary", to: Route::Login {}, "Sign in" }
                },
                (ViewState::Error(err), _) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                (ViewState::Ready(()), Some(lesson)) => rsx! {
                    Link {
                        class: "back-link",
                        to: Route::Course { course_id: lesson.course_id.value() },
                        "← Back to course"
                    }
                    if let Some(notice) = lesson.page_notice {
                        p { class: "notice", role: "status", "{notice}" }
                    }
                    h2 { "{lesson.title}" }
                    article { class: "lesson-body", dangerous_inner_html: "{lesson.html}" }
                    footer { class: "lesson-actions",
                        if lesson.completed() {
                            span { class: "badge completed",
                                "Completed"
                                if let Some(at) = lesson.completed_at().map(format_datetime) {
                                    " {at}"
                                }
                            }
                        } else {
                            button {
                                class: "button primary",
                                id: "lesson-complete",
                                disabled: !lesson.can_complete(),
                                onclick: move |_| mark_complete.call(()),
                                "Mark complete"
                            }
                        }
                        if lesson.saving() {
                            span { class: "saving", "Saving…" }
                        }
                        if let Some(quiz_id) = lesson.quiz_id {
                            Link {
                                class: "button",
                                to: Route::Quiz { quiz_id: quiz_id.value() },
                                "Take the quiz"
                            }
                        }
                    }
                    if let Some(notice) = lesson.notice() {
                        p {
                            class: if notice.is_error() { "notice error" } else { "notice" },
                            role: "status",
                            "{notice.message()}"
                        }
                    }
                },
                _ => rsx! {
                    p { "Loading lesson..." }
                },
            }
        }
    }
}
