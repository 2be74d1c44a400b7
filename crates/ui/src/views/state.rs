use api::{ApiError, CancelSignal};
use dioxus::prelude::*;
use services::ApiFailure;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    SubscriptionRequired,
    SignInRequired,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NotFound => "We couldn't find that page.",
            Self::SubscriptionRequired => "This content is available to subscribers.",
            Self::SignInRequired => "Please sign in to continue.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }

    #[must_use]
    pub fn from_api(err: &ApiError) -> Self {
        match err {
            ApiError::NotFound => Self::NotFound,
            ApiError::Forbidden(_) => Self::SubscriptionRequired,
            ApiError::Unauthorized => Self::SignInRequired,
            _ => Self::Unknown,
        }
    }

    /// Map a service error, logging what the user will not see.
    #[must_use]
    pub fn from_service<E: ApiFailure + std::fmt::Display>(err: &E) -> Self {
        let view_error = err.api_error().map_or(Self::Unknown, Self::from_api);
        if view_error == Self::Unknown && !err.is_cancelled() {
            log::warn!("view load failed: {err}");
        }
        view_error
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// A signal that fires when the calling component unmounts.
///
/// Wrap every request in `signal.guard(..)` so responses arriving after the
/// view is gone are dropped.
pub fn use_cancel_signal() -> CancelSignal {
    let signal = use_hook(CancelSignal::new);
    let on_drop = signal.clone();
    use_drop(move || on_drop.cancel());
    signal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_user_facing_states() {
        assert_eq!(ViewError::from_api(&ApiError::NotFound), ViewError::NotFound);
        assert_eq!(
            ViewError::from_api(&ApiError::Forbidden("Subscribe".into())),
            ViewError::SubscriptionRequired
        );
        assert_eq!(
            ViewError::from_api(&ApiError::Unauthorized),
            ViewError::SignInRequired
        );
        assert_eq!(ViewError::from_api(&ApiError::Timeout), ViewError::Unknown);
    }
}
