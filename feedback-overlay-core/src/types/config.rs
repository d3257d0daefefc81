//! Embed configuration types

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::FrameFocusPolicy;

/// Color mode of the panel chrome and the embedded board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Dark,
    Light,
}

impl ColorMode {
    /// Value used in the `mode` query parameter and on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse the wire value; anything but `dark`/`light` is rejected.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Infer the host page's mode from its root element class list.
    ///
    /// `dark` anywhere in the whitespace separated list means dark.
    #[must_use]
    pub fn from_host_classes(class_list: &str) -> Self {
        if class_list.split_whitespace().any(|c| c == "dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the trigger presents the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStyle {
    /// Slide-over panel anchored to the right edge.
    #[default]
    #[serde(alias = "drawer")]
    Panel,
    /// Popover anchored to the trigger.
    Popover,
    /// Plain outbound link to the board, no overlay.
    #[serde(alias = "link")]
    ExternalLink,
}

/// Public embed surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Workspace identifier (UUID v4).
    pub identifier: String,
    /// Integrator-supplied board URL; wins over the identifier when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_url: Option<String>,
    /// Configured color mode; the runtime resets to it on every full close.
    #[serde(default)]
    pub color_mode: ColorMode,
    /// Presentation discriminator.
    #[serde(default)]
    pub display_style: DisplayStyle,
}

impl WidgetConfig {
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            explicit_url: None,
            color_mode: ColorMode::default(),
            display_style: DisplayStyle::default(),
        }
    }

    #[must_use]
    pub fn with_explicit_url(mut self, url: impl Into<String>) -> Self {
        self.explicit_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    #[must_use]
    pub fn with_display_style(mut self, style: DisplayStyle) -> Self {
        self.display_style = style;
        self
    }

    /// Whether `other` loads the same board (same identifier and explicit URL).
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.explicit_url == other.explicit_url
    }
}

/// Runtime tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeOptions {
    /// API base URL for the org-upsert and feedback calls.
    pub api_base_url: String,
    /// Domain the routing token is prefixed to.
    pub product_domain: String,
    /// Delay between attaching the frame and revealing it.
    pub open_delay_ms: u64,
    /// Exit transition length; `Closing` lasts this long.
    pub close_duration_ms: u64,
    /// HTTP timeout for API calls.
    pub request_timeout_ms: u64,
    /// Whether keyboard focus may enter the embedded frame.
    pub frame_focus: FrameFocusPolicy,
    /// Narrow mobile viewport/platform detected by the host adapter.
    pub mobile_viewport: bool,
    /// Hide the frame on close instead of detaching it.
    pub keep_frame_mounted: bool,
}

/// Upper bound for either transition duration.
const MAX_TRANSITION_MS: u64 = 1000;

impl RuntimeOptions {
    #[must_use]
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    #[must_use]
    pub fn close_duration(&self) -> Duration {
        Duration::from_millis(self.close_duration_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Reject settings the runtime cannot honour.
    pub fn validate(&self) -> CoreResult<()> {
        let base = url::Url::parse(&self.api_base_url).map_err(|e| {
            CoreError::ValidationError(format!("apiBaseUrl is not a URL: {e}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CoreError::ValidationError(format!(
                "apiBaseUrl must be http(s), got {}",
                base.scheme()
            )));
        }
        if self.product_domain.trim().is_empty() || self.product_domain.contains('/') {
            return Err(CoreError::ValidationError(
                "productDomain must be a bare host name".to_string(),
            ));
        }
        if self.open_delay_ms > MAX_TRANSITION_MS {
            return Err(CoreError::ValidationError(format!(
                "openDelayMs must be at most {MAX_TRANSITION_MS}"
            )));
        }
        if self.close_duration_ms == 0 || self.close_duration_ms > MAX_TRANSITION_MS {
            return Err(CoreError::ValidationError(format!(
                "closeDurationMs must be within 1..={MAX_TRANSITION_MS}"
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(CoreError::ValidationError(
                "requestTimeoutMs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            api_base_url: feedback_overlay_client::DEFAULT_API_BASE_URL.to_string(),
            product_domain: "feedbackland.com".to_string(),
            open_delay_ms: 150,
            close_duration_ms: 250,
            request_timeout_ms: 10_000,
            frame_focus: FrameFocusPolicy::default(),
            mobile_viewport: false,
            keep_frame_mounted: true,
        }
    }
}
