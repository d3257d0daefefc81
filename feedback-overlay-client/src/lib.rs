//! # feedback-overlay-client
//!
//! HTTP client for the feedback-board API used by the embeddable overlay.
//!
//! ## Endpoints
//!
//! | Call | Method | Path | Body | Response |
//! |------|--------|------|------|----------|
//! | [`FeedbackApi::upsert_org`] | `POST` | `/api/org/upsert-org` | `{ "orgId": "<uuid>" }` | bare JSON string (routing token) |
//! | [`FeedbackApi::create_feedback`] | `POST` | `/api/feedback/create` | `{ "orgId": "<uuid>", "description": "..." }` | any 2xx |
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: Use rustls.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedback_overlay_client::{ApiConfig, FeedbackApi, HttpFeedbackApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpFeedbackApi::new(ApiConfig::default())?;
//!     let token = api
//!         .upsert_org("cc10380b-6f5f-41fc-b28b-4000c021bc3b")
//!         .await?;
//!     println!("https://{token}.feedbackland.com");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ApiError>`](ApiError). Nothing is
//! retried automatically; callers decide when to try again.

mod api;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use api::{HttpFeedbackApi, normalize_routing_token};
pub use error::{ApiError, Result};
pub use traits::FeedbackApi;
pub use types::{
    ApiConfig, CreateFeedbackRequest, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT,
    UpsertOrgRequest,
};
pub use utils::log_sanitizer::truncate_for_log;
