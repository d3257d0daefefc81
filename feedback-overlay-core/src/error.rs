//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export client error type
pub use feedback_overlay_client::ApiError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Identifier is not a canonical UUID v4
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Explicit URL is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The org-upsert call failed or returned something unusable
    #[error("Resolution failed: {0}")]
    ResolutionNetworkFailure(String),

    /// A control channel handle is still live for this overlay
    #[error("Control channel already connected (session {0})")]
    ChannelBusy(u64),

    /// No frame is attached to connect or post to
    #[error("Frame unavailable: {0}")]
    FrameUnavailable(String),

    /// Platform surface rejected an operation
    #[error("Surface error: {0}")]
    SurfaceError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The runtime loop has exited
    #[error("Overlay runtime stopped")]
    RuntimeStopped,

    /// API error (converting from client library)
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl CoreError {
    /// Whether it is expected behavior (integrator misconfiguration, flaky network, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidIdentifier(_)
            | Self::InvalidUrl(_)
            | Self::ResolutionNetworkFailure(_)
            | Self::ValidationError(_)
            | Self::RuntimeStopped => true,
            Self::Api(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
