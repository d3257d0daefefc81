//! Board URL construction

use crate::error::{CoreError, CoreResult};
use crate::types::ColorMode;

/// Append `mode=<mode>` to `url`, using `&` when a query is already present.
///
/// A fragment stays at the end. The rest of the URL is left untouched.
#[must_use]
pub fn append_mode_param(url: &str, mode: ColorMode) -> String {
    let (base, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}mode={}{fragment}", mode.as_str())
}

/// `https://<label>.<domain>`; `label` must already be a DNS label.
#[must_use]
pub fn board_origin(label: &str, product_domain: &str) -> String {
    format!("https://{label}.{product_domain}")
}

/// Check that an integrator-supplied URL is an absolute http(s) URL.
///
/// Returns the trimmed input, not the `url` crate's normalized form.
pub fn validate_explicit_url(raw: &str) -> CoreResult<&str> {
    let trimmed = raw.trim();
    let parsed =
        ::url::Url::parse(trimmed).map_err(|e| CoreError::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(CoreError::InvalidUrl(trimmed.to_string()));
    }
    Ok(trimmed)
}
