//! Log sanitization utilities
//!
//! Keeps response bodies from the feedback API (and anything echoed back by
//! an intermediary proxy) from being fully dumped into debug/error logs.

use std::borrow::Cow;

/// Maximum number of bytes of a body kept in a log line.
const TRUNCATE_LIMIT: usize = 256;

/// Truncate a response body for logging.
///
/// Bodies within `TRUNCATE_LIMIT` bytes are borrowed as-is; longer ones are
/// cut on the last char boundary at or below the limit and tagged with their
/// full length.
pub fn truncate_for_log(s: &str) -> Cow<'_, str> {
    if s.len() <= TRUNCATE_LIMIT {
        return Cow::Borrowed(s);
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);
    Cow::Owned(format!(
        "{}... [truncated, total {} bytes]",
        &s[..cut],
        s.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_unchanged() {
        let s = "\"acme\"";
        assert_eq!(truncate_for_log(s), s);
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(TRUNCATE_LIMIT);
        assert_eq!(truncate_for_log(&s), s);
    }

    #[test]
    fn html_error_page_truncated() {
        let s = format!("<html>{}</html>", "x".repeat(TRUNCATE_LIMIT * 4));
        let result = truncate_for_log(&s);
        assert!(result.starts_with("<html>"));
        assert!(result.ends_with(&format!("total {} bytes]", s.len())));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "é".repeat(300);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
    }
}
