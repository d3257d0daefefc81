use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ColorMode;
use crate::utils::url::append_mode_param;

/// Help link shown next to the invalid-identifier message.
pub const IDENTIFIER_HELP_URL: &str = "https://www.uuidtools.com/v4";

/// A loadable board URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEndpoint {
    /// Board address before the `mode` parameter is added.
    #[serde(default)]
    pub base: String,
    /// Full frame source, `mode` parameter included.
    pub url: String,
    #[serde(with = "crate::utils::timestamp")]
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedEndpoint {
    #[must_use]
    pub fn new(base: impl Into<String>, mode: ColorMode) -> Self {
        Self::at(base, mode, Utc::now())
    }

    #[must_use]
    pub fn at(base: impl Into<String>, mode: ColorMode, resolved_at: DateTime<Utc>) -> Self {
        let base = base.into();
        Self {
            url: append_mode_param(&base, mode),
            base,
            resolved_at,
        }
    }

    /// Same board, frame source rebuilt for `mode`.
    ///
    /// An endpoint without a recorded base keeps its URL.
    #[must_use]
    pub fn with_mode(mut self, mode: ColorMode) -> Self {
        if !self.base.is_empty() {
            self.url = append_mode_param(&self.base, mode);
        }
        self
    }
}

/// Message rendered inside the panel when the embed is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidTargetNotice {
    pub message: String,
    pub help_label: String,
    pub help_url: String,
}

impl InvalidTargetNotice {
    #[must_use]
    pub fn invalid_identifier() -> Self {
        Self {
            message: "The ID is missing or incorrect. Please use a valid UUID v4 as ID."
                .to_string(),
            help_label: "Generate a UUID v4".to_string(),
            help_url: IDENTIFIER_HELP_URL.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_url(url: &str) -> Self {
        Self {
            message: format!("The URL \"{url}\" is not a valid http(s) address."),
            help_label: "Check the embed URL".to_string(),
            help_url: IDENTIFIER_HELP_URL.to_string(),
        }
    }
}

/// What an `open()` request should do, decided before touching the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// Endpoint known, open immediately.
    Ready(ResolvedEndpoint),
    /// Org-upsert round trip needed first.
    Lookup { identifier: String },
    /// Bypass the overlay and navigate.
    DirectLink { url: String, new_tab: bool },
    /// Misconfigured embed; show the notice.
    Invalid(InvalidTargetNotice),
}
