//! Timestamp normalization at the store boundary.
//!
//! Local and remote timestamps are produced by different clocks and arrive
//! in different shapes: structured `{seconds, nanoseconds}` server stamps,
//! `{millis}` native objects, ISO-8601 strings, or raw millisecond numbers.
//! Everything is normalized to milliseconds since epoch here; nothing else
//! in the workspace compares timestamps in any other representation.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Normalizes any timestamp shape to milliseconds since the Unix epoch.
///
/// Missing or unparseable values normalize to 0, which sorts strictly older
/// than any real stamp — a record with a broken timestamp never wins a
/// conflict.
pub fn to_millis(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0),
        Value::Object(map) => {
            if let (Some(secs), Some(nanos)) = (
                map.get("seconds").and_then(Value::as_i64),
                map.get("nanoseconds").and_then(Value::as_i64),
            ) {
                return secs * 1000 + (nanos as f64 / 1e6).round() as i64;
            }
            if let Some(ms) = map.get("millis").and_then(Value::as_i64) {
                return ms;
            }
            0
        }
        _ => 0,
    }
}

/// Extracts the last-write marker from a record payload.
///
/// Records stamp `updatedAt` on every save; older submissions carried only
/// `submittedAt`, which is accepted as a fallback.
pub fn record_millis(payload: &Value) -> i64 {
    let stamp = payload
        .get("updatedAt")
        .filter(|v| !v.is_null())
        .or_else(|| payload.get("submittedAt"))
        .unwrap_or(&Value::Null);
    to_millis(stamp)
}

/// Current instant as a client-generated ISO-8601 string.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
