//! Wall-clock timestamp text format shared by storage and wire payloads.
//!
//! # Invariants
//! - Timestamps are naive local time with second precision.
//! - The only accepted text shape is `YYYY-MM-DD HH:MM:SS`.

use chrono::NaiveDateTime;

/// Text format for due/start times in requests, storage and responses.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses one timestamp in [`TIMESTAMP_FORMAT`].
///
/// Leading/trailing whitespace is ignored. Anything else that does not match
/// the format or is not a real calendar instant is rejected.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
}

/// Formats one timestamp in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter for `NaiveDateTime` fields using [`TIMESTAMP_FORMAT`].
pub mod text_format {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(|err| {
            serde::de::Error::custom(format!("invalid timestamp `{raw}`: {err}"))
        })
    }
}
