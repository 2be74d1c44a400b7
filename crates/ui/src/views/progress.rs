use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, use_cancel_signal, view_state_from_resource};
use crate::vm::{ProgressVm, map_progress};

#[component]
pub fn ProgressView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();
    let cancel = use_cancel_signal();

    let resource = use_resource(move || {
        let progress = progress.clone();
        let cancel = cancel.clone();
        async move {
            let page = cancel
                .guard(progress.load_progress())
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(map_progress(&page))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page progress",
            h2 { "My progress" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading progress..." }
                },
                ViewState::Ready(vm) => rsx! {
                    ProgressBody { vm }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn ProgressBody(vm: ProgressVm) -> Element {
    rsx! {
        if let Some(notice) = vm.notice {
            p { class: "notice", role: "status", "{notice}" }
        }
        div { class: "stats",
            div { class: "stat",
                span { class: "stat-value", "{vm.lessons_completed}" }
                span { class: "stat-label", "Lessons completed" }
            }
            div { class: "stat",
                span { class: "stat-value", "{vm.attempts}" }
                span { class: "stat-label", "Quiz attempts" }
            }
            div { class: "stat",
                span { class: "stat-value", "{vm.passed_attempts}" }
                span { class: "stat-label", "Passed" }
            }
            div { class: "stat",
                span { class: "stat-value", "{vm.best_score}" }
                span { class: "stat-label", "Best score" }
            }
            div { class: "stat",
                span { class: "stat-value", "{vm.average_score}" }
                span { class: "stat-label", "Average score" }
            }
        }
        section { class: "attempts",
            h3 { "Quiz attempts" }
            if vm.attempt_rows.is_empty() {
                p { class: "empty", "No quiz attempts yet." }
            } else {
                table {
                    thead {
                        tr {
                            th { "Quiz" }
                            th { "Score" }
                            th { "Result" }
                            th { "Answered" }
                            th { "When" }
                        }
                    }
                    tbody {
                        for (idx, row) in vm.attempt_rows.iter().enumerate() {
                            tr { key: "{idx}",
                                td {
                                    Link { to: Route::Quiz { quiz_id: row.quiz_id.value() }, "Quiz {row.quiz_id}" }
                                }
                                td { "{row.score_label}" }
                                td { class: if row.passed { "passed" } else { "failed" },
                                    if row.passed { "Passed" } else { "Failed" }
                                }
                                td { "{row.answered_label}" }
                                td { "{row.attempted_at_str}" }
                            }
                        }
                    }
                }
            }
        }
        section { class: "completed-lessons",
            h3 { "Completed lessons" }
            if vm.completed.is_empty() {
                p { class: "empty", "No lessons completed yet." }
            } else {
                ul {
                    for item in vm.completed.iter() {
                        li { key: "{item.lesson_id}",
                            Link { to: Route::Lesson { lesson_id: item.lesson_id.value() }, "Lesson {item.lesson_id}" }
                            span { class: "completed-at", "{item.completed_at_str}" }
                        }
                    }
                }
            }
        }
    }
}
