use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;

#[component]
pub fn NotFoundView(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    log::debug!("no route for {path}");

    rsx! {
        div { class: "page not-found",
            h2 { "Page not found" }
            p { "Nothing lives at " code { "{path}" } "." }
            Link { class: "button primary", to: Route::Catalog {}, "Back to courses" }
        }
    }
}
