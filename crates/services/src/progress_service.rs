use std::sync::Arc;

use api::ApiError;
use api::repository::ProgressRepository;
use course_core::model::{Progress, ProgressSummary};

pub const SIGN_IN_NOTICE: &str = "Sign in to track your progress.";
pub const UNAVAILABLE_NOTICE: &str = "Progress is unavailable right now.";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressPage {
    pub progress: Progress,
    pub summary: ProgressSummary,
    pub notice: Option<&'static str>,
}

#[derive(Clone)]
pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    /// Fetch progress for the signed-in user.
    ///
    /// Failures degrade to empty progress with a notice.
    pub async fn load_progress(&self) -> ProgressPage {
        match self.progress.get_progress().await {
            Ok(progress) => ProgressPage {
                summary: progress.summary(),
                progress,
                notice: None,
            },
            Err(err) => {
                log::warn!("progress unavailable: {err}");
                ProgressPage {
                    notice: Some(notice_for(&err)),
                    ..ProgressPage::default()
                }
            }
        }
    }
}

fn notice_for(err: &ApiError) -> &'static str {
    if err.is_unauthorized() {
        SIGN_IN_NOTICE
    } else {
        UNAVAILABLE_NOTICE
    }
}
