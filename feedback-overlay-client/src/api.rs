//! reqwest-backed implementation of [`FeedbackApi`].

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ApiError, Result};
use crate::http_client::HttpUtils;
use crate::traits::FeedbackApi;
use crate::types::{ApiConfig, CreateFeedbackRequest, UpsertOrgRequest};

const UPSERT_ORG_PATH: &str = "/api/org/upsert-org";
const CREATE_FEEDBACK_PATH: &str = "/api/feedback/create";

const UPSERT_ORG_ENDPOINT: &str = "upsert-org";
const CREATE_FEEDBACK_ENDPOINT: &str = "feedback-create";

/// Feedback API over HTTPS.
pub struct HttpFeedbackApi {
    client: Client,
    config: ApiConfig,
}

impl HttpFeedbackApi {
    /// Build a client for `config`.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::NetworkError {
                endpoint: "client".to_string(),
                detail: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    /// Wrap an existing `reqwest::Client` (shared connection pool).
    #[must_use]
    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl FeedbackApi for HttpFeedbackApi {
    async fn upsert_org(&self, org_id: &str) -> Result<String> {
        let url = self.config.endpoint_url(UPSERT_ORG_PATH);
        let body = UpsertOrgRequest {
            org_id: org_id.to_string(),
        };

        let request = self.client.post(&url).json(&body);
        let (status, text) =
            HttpUtils::execute_request(request, UPSERT_ORG_ENDPOINT, "POST", &url).await?;
        HttpUtils::ensure_success(status, &text, UPSERT_ORG_ENDPOINT)?;

        let token: String = HttpUtils::parse_json(&text, UPSERT_ORG_ENDPOINT)?;
        normalize_routing_token(&token)
    }

    async fn create_feedback(&self, request: &CreateFeedbackRequest) -> Result<()> {
        let url = self.config.endpoint_url(CREATE_FEEDBACK_PATH);

        let builder = self.client.post(&url).json(request);
        let (status, text) =
            HttpUtils::execute_request(builder, CREATE_FEEDBACK_ENDPOINT, "POST", &url).await?;
        HttpUtils::ensure_success(status, &text, CREATE_FEEDBACK_ENDPOINT)
    }
}

/// Validate a routing token as a single DNS label and lowercase it.
///
/// The token becomes the left-most label of the frame's host, so anything
/// that could change the host (dots, slashes, `@`, ports) is rejected.
pub fn normalize_routing_token(token: &str) -> Result<String> {
    let token = token.trim();
    let valid = !token.is_empty()
        && token.len() <= 63
        && !token.starts_with('-')
        && !token.ends_with('-')
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-');

    if valid {
        Ok(token.to_ascii_lowercase())
    } else {
        log::warn!("[{UPSERT_ORG_ENDPOINT}] Rejected routing token: {token:?}");
        Err(ApiError::InvalidResponse {
            endpoint: UPSERT_ORG_ENDPOINT.to_string(),
            detail: "routing token is not a DNS label".to_string(),
        })
    }
}
