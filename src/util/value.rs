//! Lenient readers over untyped JSON values.

use serde_json::Value;

/// A trimmed, non-empty string value.
pub fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Render a scalar as message text. Strings are trimmed; blanks, nulls,
/// arrays and objects yield `None`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => non_empty_str(value).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce a number or numeric string to a non-negative whole number of seconds.
///
/// Fractions are floored. Negative, non-finite and non-numeric input yields `None`.
pub fn coerce_seconds(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(floor_seconds)),
        Value::String(s) => coerce_seconds_str(s),
        _ => None,
    }
}

pub fn coerce_seconds_str(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<u64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(floor_seconds))
}

fn floor_seconds(secs: f64) -> Option<u64> {
    (secs.is_finite() && secs >= 0.0).then(|| secs.floor() as u64)
}
