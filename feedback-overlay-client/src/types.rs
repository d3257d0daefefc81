//! Request/response types for the feedback API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.feedbackland.com";

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of `POST /api/org/upsert-org`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpsertOrgRequest {
    /// Organization id (the embed identifier, a UUID v4).
    pub org_id: String,
}

/// Body of `POST /api/feedback/create`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    /// Organization id the feedback is filed under.
    pub org_id: String,
    /// Free-text feedback, already trimmed and length-checked by the caller.
    pub description: String,
}

/// Connection settings for [`HttpFeedbackApi`](crate::HttpFeedbackApi).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slash, e.g. `https://api.feedbackland.com`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build a config for `base_url`, stripping any trailing slashes.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for an API path (`path` starts with `/`).
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
