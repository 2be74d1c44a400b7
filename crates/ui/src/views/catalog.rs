use dioxus::prelude::*;
use dioxus_router::use_navigator;

use course_core::model::Viewer;
use services::ALL_CATEGORIES;

use crate::context::{AppContext, use_signed_in};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, use_cancel_signal, view_state_from_resource};
use crate::vm::{CatalogVm, CourseCardVm};

#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let auth = ctx.auth();
    let cancel = use_cancel_signal();
    let signed_in = use_signed_in();

    let mut query = use_signal(String::new);
    let mut category = use_signal(|| ALL_CATEGORIES.to_string());

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let auth = auth.clone();
        let cancel = cancel.clone();
        // Reloads whenever the user signs in or out.
        let is_signed_in = signed_in();
        async move {
            let load = async {
                let page = catalog.load_catalog().await;
                // The profile only refines locking; a failure keeps the anonymous view.
                let viewer = if is_signed_in {
                    match auth.current_user().await {
                        Ok(Some(profile)) => profile.viewer(),
                        Ok(None) | Err(_) => Viewer {
                            signed_in: auth.is_signed_in(),
                            subscriber: false,
                        },
                    }
                } else {
                    Viewer::anonymous()
                };
                CatalogVm::new(page, viewer)
            };
            cancel.guard(load).await.map_err(|_| ViewError::Unknown)
        }
    });

    let state = view_state_from_resource(&resource);
    let cards = match &state {
        ViewState::Ready(vm) => vm.visible(&query.read(), &category.read()),
        _ => Vec::new(),
    };

    rsx! {
        div { class: "page catalog",
            h2 { "Courses" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading courses..." }
                },
                ViewState::Ready(vm) => rsx! {
                        if let Some(notice) = vm.notice() {
                            p { class: "notice", role: "status", "{notice}" }
                        }
                        div { class: "catalog-filters",
                            input {
                                class: "search",
                                r#type: "search",
                                placeholder: "Search courses",
                                value: "{query}",
                                oninput: move |evt: FormEvent| query.set(evt.value()),
                            }
                            div { class: "chips",
                                for name in vm.categories().iter().cloned() {
                                    button {
                                        class: if *category.read() == name { "chip active" } else { "chip" },
                                        onclick: move |_| category.set(name.clone()),
                                        "{name}"
                                    }
                                }
                            }
                        }
                        if cards.is_empty() {
                            p { class: "empty", "No courses match your search." }
                        } else {
                            div { class: "course-grid",
                                for card in cards {
                                    CourseCard { key: "{card.id}", card }
                                }
                            }
                        }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn CourseCard(card: CourseCardVm) -> Element {
    let navigator = use_navigator();
    let id = card.id.value();
    let locked = card.locked;

    rsx! {
        article {
            class: if card.premium { "course-card premium" } else { "course-card" },
            onclick: move |_| {
                if locked {
                    navigator.push(Route::Pricing {});
                } else {
                    navigator.push(Route::Course { course_id: id });
                }
            },
            header {
                span { class: "category", "{card.category}" }
                span { class: "price", "{card.price_label}" }
            }
            h3 { "{card.title}" }
            p { class: "description", "{card.description}" }
            p { class: "meta",
                "{card.difficulty} · {card.lessons_label}"
                if !card.duration.is_empty() {
                    " · {card.duration}"
                }
            }
            if !card.instructor.is_empty() {
                p { class: "instructor", "{card.instructor}" }
            }
            footer {
                if let Some(rating) = card.rating_label.clone() {
                    span { class: "rating", "{rating}" }
                }
                if let Some(students) = card.students_label.clone() {
                    span { class: "students", "{students}" }
                }
                if locked {
                    span { class: "lock", "Subscribe to unlock" }
                }
            }
        }
    }
}
