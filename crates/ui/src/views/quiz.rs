use dioxus::prelude::*;
use dioxus_router::Link;

use std::sync::Arc;

use api::CancelSignal;
use chrono::{DateTime, Utc};
use course_core::model::{AnswerSet, QuizId};
use services::{QuizLoopService, SubmitStep};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, use_cancel_signal, view_state_from_resource};
use crate::vm::{QuestionVm, QuizIntent, QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn QuizView(quiz_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();
    let cancel = use_cancel_signal();
    let vm = use_signal(|| None::<QuizVm>);

    let resource = {
        let quiz_loop = quiz_loop.clone();
        let cancel = cancel.clone();
        use_resource(use_reactive((&quiz_id,), move |(quiz_id,)| {
            let quiz_loop = quiz_loop.clone();
            let cancel = cancel.clone();
            let mut vm = vm;
            async move {
                let started = cancel
                    .guard(start_quiz(&quiz_loop, QuizId::new(quiz_id)))
                    .await
                    .map_err(|_| ViewError::Unknown)?
                    .map_err(|err| ViewError::from_service(&err))?;
                vm.set(Some(started));
                Ok::<_, ViewError>(())
            }
        }))
    };

    let dispatch_intent = use_callback(move |intent: QuizIntent| {
        let mut vm = vm;
        let (quiz_id, step) = {
            let mut guard = vm.write();
            let Some(quiz) = guard.as_mut() else {
                return;
            };
            let step = match intent {
                QuizIntent::Select { question, choice } => {
                    quiz.select(question, choice);
                    SubmitStep::Ignored
                }
                QuizIntent::Submit => quiz.request_submit(),
                QuizIntent::Confirm => quiz.confirm_submit(),
                QuizIntent::CancelConfirm => {
                    quiz.cancel_confirm();
                    SubmitStep::Ignored
                }
                QuizIntent::Reset => {
                    quiz.reset();
                    SubmitStep::Ignored
                }
            };
            (quiz.quiz_id(), step)
        };
        let SubmitStep::Send(answers) = step else {
            return;
        };
        let quiz_loop = quiz_loop.clone();
        let cancel = cancel.clone();
        let now = ctx.now();
        spawn(send_answers(vm, quiz_loop, cancel, quiz_id, answers, now));
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let state = view_state_from_resource(&resource);
    let guard = vm.read();

    rsx! {
        div { class: "page quiz",
            match (state, guard.as_ref()) {
                (ViewState::Error(err @ ViewError::SubscriptionRequired), _) => rsx! {
                    div { class: "paywall",
                        h2 { "Quizzes are for subscribers" }
                        p { "{err.message()}" }
                        Link { class: "button primary", to: Route::Pricing {}, "See plans" }
                    }
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
                (ViewState::Ready(()), Some(quiz)) => rsx! {
                    QuizBody {
                        title: quiz.title().to_string(),
                        pass_label: quiz.pass_label(),
                        answered_label: quiz.answered_label(),
                        questions: quiz.questions(),
                        disabled: quiz.inputs_disabled(),
                        submitting: quiz.is_submitting(),
                        confirmation: quiz.confirmation_label(),
                        error: quiz.error().map(str::to_string),
                        dispatch: dispatch_intent,
                    }
                    if let Some(result) = quiz.result() {
                        section {
                            class: if result.passed { "quiz-result passed" } else { "quiz-result failed" },
                            role: "status",
                            h3 { "{result.headline}" }
                            p { class: "score", "{result.score_label}" }
                            p { "{result.tally}" }
                            if let Some((message, is_error)) = quiz.auto_complete_notice() {
                                p { class: if is_error { "notice error" } else { "notice" }, "{message}" }
                            }
                            div { class: "result-actions",
                                if let Some(next) = result.next_lesson_id {
                                    Link {
                                        class: "button primary",
                                        to: Route::Lesson { lesson_id: next.value() },
                                        "Next lesson"
                                    }
                                }
                                button {
                                    class: "button",
                                    id: "quiz-retry",
                                    onclick: move |_| dispatch_intent.call(QuizIntent::Reset),
                                    "Try again"
                                }
                            }
                        }
                    }
                },
                _ => rsx! {
                    p { "Loading quiz..." }
                },
            }
        }
    }
}

async fn send_answers(
    mut vm: Signal<Option<QuizVm>>,
    quiz_loop: Arc<QuizLoopService>,
    cancel: CancelSignal,
    quiz_id: QuizId,
    answers: AnswerSet,
    submitted_at: DateTime<Utc>,
) {
    let Ok(outcome) = cancel.guard(quiz_loop.submit_answers(quiz_id, &answers)).await else {
        return;
    };
    let linked = {
        let mut guard = vm.write();
        let Some(quiz) = guard.as_mut() else {
            return;
        };
        match outcome {
            Ok(result) => quiz.record_result(result, submitted_at),
            Err(err) => {
                log::warn!("quiz {quiz_id} submission failed: {err}");
                quiz.record_failure("Couldn't submit your answers. Please try again.");
                None
            }
        }
    };
    let Some(lesson_id) = linked else {
        return;
    };
    let Ok(status) = cancel.guard(quiz_loop.complete_linked_lesson(lesson_id)).await else {
        return;
    };
    if let Some(quiz) = vm.write().as_mut() {
        quiz.set_auto_complete(status);
    }
}

#[component]
fn QuizBody(
    title: String,
    pass_label: String,
    answered_label: String,
    questions: Vec<QuestionVm>,
    disabled: bool,
    submitting: bool,
    confirmation: Option<String>,
    error: Option<String>,
    dispatch: Callback<QuizIntent>,
) -> Element {
    rsx! {
        header { class: "quiz-header",
            h2 { "{title}" }
            p { class: "meta", "{pass_label} · {answered_label}" }
        }
        form {
            class: "quiz-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                dispatch.call(QuizIntent::Submit);
            },
            for question in questions {
                fieldset { key: "{question.index}", class: "question", disabled,
                    legend { "{question.number}. {question.text}" }
                    for choice in question.choices.clone() {
                        label { key: "{choice.index}", class: "choice",
                            input {
                                r#type: "radio",
                                name: "question-{question.index}",
                                checked: choice.selected,
                                disabled,
                                onchange: {
                                    let question = question.index;
                                    let choice = choice.index;
                                    move |_| dispatch.call(QuizIntent::Select { question, choice })
                                },
                            }
                            span { "{choice.label}" }
                        }
                    }
                }
            }
            if let Some(message) = error {
                p { class: "notice error", role: "alert", "{message}" }
            }
            button {
                class: "button primary",
                id: "quiz-submit",
                r#type: "submit",
                disabled,
                if submitting { "Submitting…" } else { "Submit answers" }
            }
        }
        if let Some(remaining) = confirmation {
            div { class: "dialog-backdrop",
                div { class: "dialog", role: "dialog",
                    h3 { "Submit with unanswered questions?" }
                    p { "{remaining}" }
                    div { class: "dialog-actions",
                        button {
                            class: "button",
                            id: "quiz-confirm-cancel",
                            onclick: move |_| dispatch.call(QuizIntent::CancelConfirm),
                            "Keep answering"
                        }
                        button {
                            class: "button primary",
                            id: "quiz-confirm-submit",
                            onclick: move |_| dispatch.call(QuizIntent::Confirm),
                            "Submit anyway"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
