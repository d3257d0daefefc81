use serde::{Deserialize, Serialize};

/// Unified error type for all feedback API operations.
///
/// Each variant carries the `endpoint` that produced it (`upsert-org`,
/// `feedback-create`) so log lines and surfaced messages stay attributable.
/// All variants are serializable for structured error reporting.
///
/// Unlike a typical API client, nothing here is retried automatically: the
/// organization upsert is re-attempted only when the user opens the overlay
/// again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "code")]
pub enum ApiError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The API answered with a non-success HTTP status.
    HttpStatus {
        /// Endpoint that produced the error.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// The response parsed but its content is unusable (e.g. a routing token
    /// that is not a DNS label).
    InvalidResponse {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Description of what's wrong.
        detail: String,
    },
}

impl ApiError {
    /// 是否为预期行为（网络波动、服务端拒绝等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }

    /// Endpoint name the error belongs to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::NetworkError { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::HttpStatus { endpoint, .. }
            | Self::ParseError { endpoint, .. }
            | Self::SerializationError { endpoint, .. }
            | Self::InvalidResponse { endpoint, .. } => endpoint,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { endpoint, detail } => {
                write!(f, "[{endpoint}] Network error: {detail}")
            }
            Self::Timeout { endpoint, detail } => {
                write!(f, "[{endpoint}] Request timeout: {detail}")
            }
            Self::HttpStatus {
                endpoint, status, ..
            } => {
                write!(f, "[{endpoint}] HTTP {status}")
            }
            Self::ParseError { endpoint, detail } => {
                write!(f, "[{endpoint}] Parse error: {detail}")
            }
            Self::SerializationError { endpoint, detail } => {
                write!(f, "[{endpoint}] Serialization error: {detail}")
            }
            Self::InvalidResponse { endpoint, detail } => {
                write!(f, "[{endpoint}] Invalid response: {detail}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
