//! `resolvedAt` serde helpers.
//!
//! Written as epoch milliseconds (what a browser `Date.now()` produces);
//! read back from milliseconds or an RFC3339 string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(dt.timestamp_millis())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MillisOrRfc3339 {
        Millis(i64),
        Text(String),
    }

    match MillisOrRfc3339::deserialize(deserializer)? {
        MillisOrRfc3339::Millis(ms) => {
            DateTime::from_timestamp_millis(ms).ok_or_else(|| Error::custom("timestamp out of range"))
        }
        MillisOrRfc3339::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::types::ResolvedEndpoint;

    #[test]
    fn resolved_at_as_millis() {
        let endpoint: ResolvedEndpoint = serde_json::from_str(
            r#"{"url":"https://acme.feedbackland.com?mode=dark","resolvedAt":1700000000123}"#,
        )
        .unwrap();
        assert_eq!(endpoint.resolved_at.timestamp_millis(), 1_700_000_000_123);

        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["resolvedAt"], 1_700_000_000_123_i64);
    }

    #[test]
    fn resolved_at_from_rfc3339() {
        let endpoint: ResolvedEndpoint = serde_json::from_str(
            r#"{"url":"https://acme.feedbackland.com","resolvedAt":"2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(endpoint.resolved_at.timestamp(), 1_709_294_400);
    }
}
