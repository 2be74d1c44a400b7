use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::SubscriptionPlan;
use services::{PurchaseReceipt, SubscriptionError};

use crate::context::{AppContext, use_signed_in};
use crate::routes::Route;
use crate::views::use_cancel_signal;
use crate::vm::format_datetime;

#[derive(Clone, Debug, PartialEq)]
enum Checkout {
    Idle,
    Processing(&'static str),
    Done(PurchaseReceipt),
    Failed(String),
}

fn checkout_message(err: &SubscriptionError) -> String {
    match err {
        SubscriptionError::SignInRequired => "Sign in before choosing a plan.".to_string(),
        SubscriptionError::Api(_) => "The purchase didn't go through. Please try again.".to_string(),
        other => other.to_string(),
    }
}

#[component]
pub fn PricingView() -> Element {
    let ctx = use_context::<AppContext>();
    let subscriptions = ctx.subscriptions();
    let plans = subscriptions.plans();
    let cancel = use_cancel_signal();
    let signed_in = use_signed_in();
    let checkout = use_signal(|| Checkout::Idle);

    let purchase = use_callback(move |plan_id: &'static str| {
        let mut checkout = checkout;
        if matches!(*checkout.read(), Checkout::Processing(_)) {
            return;
        }
        checkout.set(Checkout::Processing(plan_id));
        let subscriptions = subscriptions.clone();
        let cancel = cancel.clone();
        spawn(async move {
            let Ok(outcome) = cancel.guard(subscriptions.purchase(plan_id)).await else {
                return;
            };
            checkout.set(match outcome {
                Ok(receipt) => Checkout::Done(receipt),
                Err(err) => Checkout::Failed(checkout_message(&err)),
            });
        });
    });

    let current = checkout.read().clone();

    rsx! {
        div { class: "page pricing",
            h2 { "Choose a plan" }
            p { class: "lead", "Unlock every premium course, lesson and quiz." }
            if !signed_in() {
                p { class: "notice", role: "status",
                    "You'll need an account to subscribe. "
                    Link { to: Route::Login {}, "Sign in" }
                    " or "
                    Link { to: Route::Signup {}, "create one" }
                    "."
                }
            }
            match current {
                Checkout::Done(receipt) => rsx! {
                    Receipt { receipt }
                },
                Checkout::Failed(message) => rsx! {
                    p { class: "notice error", role: "alert", "{message}" }
                    PlanGrid { plans: plans.clone(), processing: None, enabled: signed_in(), purchase }
                },
                Checkout::Processing(plan_id) => rsx! {
                    PlanGrid { plans: plans.clone(), processing: Some(plan_id), enabled: false, purchase }
                },
                Checkout::Idle => rsx! {
                    PlanGrid { plans: plans.clone(), processing: None, enabled: signed_in(), purchase }
                },
            }
        }
    }
}

#[component]
fn PlanGrid(
    plans: Vec<SubscriptionPlan>,
    processing: Option<&'static str>,
    enabled: bool,
    purchase: Callback<&'static str>,
) -> Element {
    rsx! {
        div { class: "plan-grid",
            for plan in plans {
                div {
                    key: "{plan.id}",
                    class: if plan.highlighted { "plan highlighted" } else { "plan" },
                    h3 { "{plan.name}" }
                    p { class: "price", "{plan.price_label()}" }
                    ul {
                        for feature in plan.features.iter() {
                            li { "{feature}" }
                        }
                    }
                    button {
                        class: "button primary",
                        id: "plan-{plan.id}",
                        disabled: !enabled,
                        onclick: move |_| purchase.call(plan.id),
                        if processing == Some(plan.id) { "Processing…" } else { "Choose {plan.name}" }
                    }
                }
            }
        }
    }
}

#[component]
fn Receipt(receipt: PurchaseReceipt) -> Element {
    let purchased_at = format_datetime(receipt.purchased_at);
    rsx! {
        section { class: "receipt", role: "status",
            h3 { "You're subscribed!" }
            p { "{receipt.plan.name} · {receipt.plan.price_label()}" }
            p { "Confirmation code: "
                code { "{receipt.confirmation_code}" }
            }
            p { class: "meta", "Purchased {purchased_at}" }
            Link { class: "button primary", to: Route::Catalog {}, "Browse courses" }
        }
    }
}
