//! Tolerant ISO-8601 timestamp (de)serialization.
//!
//! The directory serves access windows as ISO-8601 strings, but not every
//! deployment includes a UTC offset. Offset-less timestamps are interpreted
//! as UTC; the directory and the door units are expected to share a clock
//! basis.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse an ISO-8601 timestamp, accepting both RFC 3339 and naive forms.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Offset-less form, e.g. "2025-05-10T12:46:06" or with fractional seconds
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{s}': {e}"))
}

pub fn serialize<S: Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_iso8601(&s).map_err(serde::de::Error::custom)
}
