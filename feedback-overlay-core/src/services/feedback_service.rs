//! Quick feedback submission for the popover style

use std::sync::Arc;

use feedback_overlay_client::{CreateFeedbackRequest, FeedbackApi};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{SubmissionStatus, MAX_FEEDBACK_CHARS};
use crate::utils::identifier::validate_identifier;

/// Feedback submission service
pub struct FeedbackService {
    api: Arc<dyn FeedbackApi>,
    status: RwLock<SubmissionStatus>,
}

impl FeedbackService {
    #[must_use]
    pub fn new(api: Arc<dyn FeedbackApi>) -> Self {
        Self {
            api,
            status: RwLock::new(SubmissionStatus::Active),
        }
    }

    pub async fn status(&self) -> SubmissionStatus {
        *self.status.read().await
    }

    /// Back to `Active`, e.g. when the popover is reopened.
    pub async fn reset(&self) {
        *self.status.write().await = SubmissionStatus::Active;
    }

    /// 提交反馈
    ///
    /// Validation failures leave the status untouched; only the API call
    /// moves it to `Success` or `Error`.
    pub async fn submit(&self, identifier: &str, description: &str) -> CoreResult<()> {
        validate_identifier(identifier)?;

        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::ValidationError(
                "Feedback cannot be empty.".to_string(),
            ));
        }
        if description.chars().count() > MAX_FEEDBACK_CHARS {
            return Err(CoreError::ValidationError(format!(
                "Feedback must be at most {MAX_FEEDBACK_CHARS} characters."
            )));
        }

        let request = CreateFeedbackRequest {
            org_id: identifier.to_string(),
            description: description.to_string(),
        };
        match self.api.create_feedback(&request).await {
            Ok(()) => {
                log::info!("[feedback] submitted for {identifier}");
                *self.status.write().await = SubmissionStatus::Success;
                Ok(())
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[feedback] submit failed: {e}");
                } else {
                    log::error!("[feedback] submit failed: {e}");
                }
                *self.status.write().await = SubmissionStatus::Error;
                Err(e.into())
            }
        }
    }
}
