//! Feedback API trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::CreateFeedbackRequest;

/// Remote feedback-board API.
///
/// The overlay runtime depends on this trait rather than on the HTTP
/// implementation so tests and alternative transports can be injected.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    /// Upsert the organization and return its routing token.
    ///
    /// Idempotent: repeated calls with the same `org_id` return the same token.
    async fn upsert_org(&self, org_id: &str) -> Result<String>;

    /// File a piece of feedback.
    async fn create_feedback(&self, request: &CreateFeedbackRequest) -> Result<()>;
}
