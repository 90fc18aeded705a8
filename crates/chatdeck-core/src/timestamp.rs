//! Instant handling shared by the domain model and the persistence codec.
//!
//! Instants are stored as RFC 3339 UTC strings with exactly millisecond
//! precision (`2024-05-01T10:00:00.123Z`), so every instant produced by
//! [`now`] survives an encode/decode cycle unchanged.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Current time, truncated to the precision of the textual format.
pub fn now() -> DateTime<Utc> {
    truncate(Utc::now())
}

/// Drops sub-millisecond precision.
pub fn truncate(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

/// Canonical textual form of an instant.
pub fn format(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses any RFC 3339 timestamp into a UTC instant.
pub fn parse(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
}

/// `#[serde(with = "crate::timestamp::millis")]` adapter.
pub mod millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format(instant))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse(&text)
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{text}': {e}")))
    }
}
