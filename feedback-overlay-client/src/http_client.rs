//! Shared HTTP request handling
//!
//! Every endpoint builds its own `RequestBuilder`; this module owns the part
//! that is the same for all of them: sending, logging, mapping transport
//! failures, and decoding JSON.
//!
//! Requests are sent exactly once. The organization upsert is deliberately
//! not retried here; a failed resolution is re-attempted only on the next
//! user-initiated open.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP helper functions
pub struct HttpUtils;

impl HttpUtils {
    /// Send a request and return `(status_code, response_text)`.
    ///
    /// Transport failures become `Timeout` or `NetworkError`; HTTP status
    /// codes are returned as-is for the caller to judge (see
    /// [`HttpUtils::ensure_success`]).
    pub async fn execute_request(
        request_builder: RequestBuilder,
        endpoint: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ApiError> {
        log::debug!("[{endpoint}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ApiError::NetworkError {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{endpoint}] Response Status: {status_code}");

        let response_text = response.text().await.map_err(|e| ApiError::NetworkError {
            endpoint: endpoint.to_string(),
            detail: format!("Failed to read response body: {e}"),
        })?;

        log::debug!(
            "[{endpoint}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Reject non-2xx responses with `ApiError::HttpStatus`.
    pub fn ensure_success(status_code: u16, body: &str, endpoint: &str) -> Result<(), ApiError> {
        if (200..300).contains(&status_code) {
            return Ok(());
        }
        log::warn!("[{endpoint}] HTTP {status_code}");
        Err(ApiError::HttpStatus {
            endpoint: endpoint.to_string(),
            status: status_code,
            body: truncate_for_log(body).into_owned(),
        })
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{endpoint}] JSON parse failed: {e}");
            log::error!("[{endpoint}] Raw response: {}", truncate_for_log(response_text));
            ApiError::ParseError {
                endpoint: endpoint.to_string(),
                detail: e.to_string(),
            }
        })
    }
}
