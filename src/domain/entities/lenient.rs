//! Serde helpers for documents written by older clients, where numbers may be
//! stored as strings and absent media as empty strings. Timestamps are
//! written in the same fixed `...sssZ` form those clients used, so that they
//! sort as text.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::utils::form_fields::parse_int_lenient;

/// Reads a missing, null or empty string as `None`.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Accepts integers, floats (truncated), numeric strings and null (as 0).
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => parse_int_lenient(&s).unwrap_or_default(),
        _ => 0,
    })
}

/// Accepts any JSON scalar or array as its textual form; null stays `None`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// The current time at the precision timestamps are stored with.
pub fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Writes `2024-05-01T10:00:00.000Z`: UTC, millisecond precision.
pub(crate) fn iso_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub(crate) fn iso_millis_opt<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(value) => iso_millis(value, serializer),
        None => serializer.serialize_none(),
    }
}

/// Absent media is written as `""`.
pub(crate) fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}
