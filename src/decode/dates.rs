//! Date handling for the `ddd MMM dd HH:mm:ss +zzzz yyyy` wire format
//!
//! Use with `#[serde(with = "cursorkit::decode::dates")]` on a
//! `DateTime<Utc>` field, or `dates::option` on an `Option<DateTime<Utc>>`.
//! Both the wire format and RFC 3339 are accepted on input; output is
//! always RFC 3339.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

/// Wire format, e.g. `Wed Aug 27 13:08:45 +0000 2008`
pub const WIRE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a date in the wire format or RFC 3339
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, WIRE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a date as RFC 3339 with a `Z` suffix
pub fn to_rfc3339(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_rfc3339(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognized date '{raw}'")))
}

/// Same as the parent module, for optional fields
pub mod option {
    use super::{parse, to_rfc3339};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&to_rfc3339(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("unrecognized date '{raw}'"))),
            None => Ok(None),
        }
    }
}
