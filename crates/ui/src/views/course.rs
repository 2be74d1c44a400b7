use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::CourseId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, use_cancel_signal, view_state_from_resource};
use crate::vm::{CourseDetailVm, LessonRowVm, map_course_detail};

#[component]
pub fn CourseView(course_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let courses = ctx.courses();
    let cancel = use_cancel_signal();

    let resource = use_resource(use_reactive((&course_id,), move |(course_id,)| {
        let courses = courses.clone();
        let cancel = cancel.clone();
        async move {
            let page = cancel
                .guard(courses.load_course(CourseId::new(course_id)))
                .await
                .map_err(|_| ViewError::Unknown)?
                .map_err(|err| ViewError::from_service(&err))?;
            Ok::<_, ViewError>(map_course_detail(&page))
        }
    }));

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page course-detail",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading course..." }
                },
                ViewState::Ready(vm) => rsx! {
                    CourseDetail { vm }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { to: Route::Catalog {}, "Back to courses" }
                },
            }
        }
    }
}

#[component]
fn CourseDetail(vm: CourseDetailVm) -> Element {
    let width = format!("width: {}%", vm.completion_percent);
    let next_up = vm.next_up().cloned();
    let meta = vm.meta.join(" · ");

    rsx! {
        Link { class: "back-link", to: Route::Catalog {}, "← All courses" }
        if let Some(notice) = vm.notice {
            p { class: "notice", role: "status", "{notice}" }
        }
        header { class: "course-header",
            h2 { "{vm.title}" }
            if vm.premium {
                span { class: "badge premium", "Premium · {vm.price_label}" }
            }
            p { class: "description", "{vm.description}" }
            if !vm.instructor.is_empty() {
                p { class: "instructor", "Taught by {vm.instructor}" }
            }
            p { class: "meta", "{meta}" }
        }
        section { class: "course-progress",
            div { class: "progress-bar",
                div { class: "progress-fill", style: "{width}" }
            }
            p { "{vm.completion_percent}% · {vm.completion_label}" }
            if let Some(next) = next_up {
                Link {
                    class: "button primary",
                    to: Route::Lesson { lesson_id: next.id.value() },
                    "Continue: {next.title}"
                }
            }
        }
        section { class: "lesson-list",
            h3 { "Lessons" }
            if vm.lessons.is_empty() {
                p { class: "empty", "No lessons yet." }
            } else {
                ol {
                    for row in vm.lessons.clone() {
                        LessonRow { key: "{row.id}", row }
                    }
                }
            }
        }
    }
}

#[component]
fn LessonRow(row: LessonRowVm) -> Element {
    rsx! {
        li { class: if row.completed { "lesson-row completed" } else { "lesson-row" },
            span { class: "position", "{row.position}" }
            Link { to: Route::Lesson { lesson_id: row.id.value() }, "{row.title}" }
            if row.completed {
                span { class: "check", "✓" }
                if let Some(at) = row.completed_at_str.clone() {
                    span { class: "completed-at", "Completed {at}" }
                }
            }
        }
    }
}
