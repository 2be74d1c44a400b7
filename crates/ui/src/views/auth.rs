use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use services::AuthError;

use crate::context::{AppContext, use_signed_in};
use crate::routes::Route;
use crate::views::use_cancel_signal;

fn auth_message(err: &AuthError) -> String {
    match err {
        AuthError::Api(_) => "Couldn't reach the server. Please try again.".to_string(),
        other => other.to_string(),
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let cancel = use_cancel_signal();
    let navigator = use_navigator();
    let mut signed_in = use_signed_in();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        error.set(None);
        let auth = auth.clone();
        let cancel = cancel.clone();
        let (email, password) = (email(), password());
        spawn(async move {
            let Ok(outcome) = cancel.guard(auth.login(&email, &password)).await else {
                return;
            };
            busy.set(false);
            match outcome {
                Ok(()) => {
                    signed_in.set(true);
                    navigator.push(Route::Catalog {});
                }
                Err(err) => error.set(Some(auth_message(&err))),
            }
        });
    };

    rsx! {
        div { class: "page auth",
            h2 { "Sign in" }
            form { class: "auth-form", onsubmit: submit,
                label { "Email"
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { "Password"
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                if let Some(message) = error() {
                    p { class: "notice error", role: "alert", "{message}" }
                }
                button { class: "button primary", r#type: "submit", disabled: busy(),
                    if busy() { "Signing in…" } else { "Sign in" }
                }
            }
            p { class: "switch",
                "New here? "
                Link { to: Route::Signup {}, "Create an account" }
            }
        }
    }
}

#[component]
pub fn SignupView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let cancel = use_cancel_signal();
    let navigator = use_navigator();
    let mut signed_in = use_signed_in();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        error.set(None);
        let auth = auth.clone();
        let cancel = cancel.clone();
        let (name, email, password) = (name(), email(), password());
        spawn(async move {
            let Ok(outcome) = cancel.guard(auth.signup(&name, &email, &password)).await else {
                return;
            };
            busy.set(false);
            match outcome {
                Ok(()) => {
                    signed_in.set(true);
                    navigator.push(Route::Catalog {});
                }
                Err(err) => error.set(Some(auth_message(&err))),
            }
        });
    };

    rsx! {
        div { class: "page auth",
            h2 { "Create an account" }
            form { class: "auth-form", onsubmit: submit,
                label { "Name"
                    input {
                        r#type: "text",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                label { "Email"
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { "Password"
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                if let Some(message) = error() {
                    p { class: "notice error", role: "alert", "{message}" }
                }
                button { class: "button primary", r#type: "submit", disabled: busy(),
                    if busy() { "Creating account…" } else { "Sign up" }
                }
            }
            p { class: "switch",
                "Already have an account? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::ApiError;

    #[test]
    fn validation_errors_are_shown_verbatim() {
        assert_eq!(
            auth_message(&AuthError::PasswordTooShort { min: 6 }),
            "password must be at least 6 characters"
        );
        assert_eq!(
            auth_message(&AuthError::Api(ApiError::Timeout)),
            "Couldn't reach the server. Please try again."
        );
    }
}
