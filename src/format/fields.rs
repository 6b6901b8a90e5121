//! Field-level validation errors.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ClientError, ProblemErrors};
use crate::util::value::{non_empty_str, value_text};

/// Field path (`address.city`, `items[2].sku`) to its messages, in order.
/// Lists are never empty.
pub type FieldErrorsMap = BTreeMap<String, Vec<String>>;

/// Key for messages not attributed to a field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const DEFAULT_FIELD_MESSAGE: &str = "Invalid value.";

/// Leading `loc` segments naming where the value came from rather than a field.
const SCOPE_TOKENS: [&str; 6] = ["body", "query", "path", "header", "cookie", "__root__"];

/// Collect per-field messages from `meta.errors`.
///
/// ```
/// use ott_errors::error::{ClientError, UnifiedError};
/// use ott_errors::format::extract_field_errors;
///
/// let meta = serde_json::json!({
///     "errors": [{"loc": ["body", "items", 2, "sku"], "msg": "Unknown SKU"}]
/// });
/// let err: ClientError = UnifiedError::builder()
///     .status(422)
///     .meta(meta.as_object().unwrap().clone())
///     .build()
///     .into();
/// let fields = extract_field_errors(&err);
/// assert_eq!(fields["items[2].sku"], vec!["Unknown SKU".to_string()]);
/// ```
pub fn extract_field_errors(err: &ClientError) -> FieldErrorsMap {
    let mut out = FieldErrorsMap::new();
    match problem_errors(err) {
        Some(ProblemErrors::List(items)) => {
            for item in &items {
                collect_list_item(item, &mut out);
            }
        }
        Some(ProblemErrors::Map(map)) => {
            for (field, value) in &map {
                collect_map_entry(field, value, &mut out);
            }
        }
        None => {}
    }
    out
}

/// True for 422 responses, or when the body carries validation errors.
pub fn is_validation_error(err: &ClientError) -> bool {
    let status = match err {
        ClientError::Api(unified) => unified.status(),
        ClientError::Legacy(legacy) => Some(legacy.status()),
        _ => return false,
    };
    if status == Some(422) {
        return true;
    }
    match problem_errors(err) {
        Some(ProblemErrors::List(items)) => !items.is_empty(),
        Some(ProblemErrors::Map(_)) => true,
        None => false,
    }
}

/// First message reported for `field`.
pub fn format_field_error(field: &str, err: &ClientError) -> Option<String> {
    extract_field_errors(err)
        .remove(field)
        .and_then(|messages| messages.into_iter().next())
}

fn problem_errors(err: &ClientError) -> Option<ProblemErrors> {
    let problem = match err {
        ClientError::Api(unified) => unified.problem()?,
        ClientError::Legacy(legacy) => legacy.problem()?,
        _ => return None,
    };
    problem.errors
}

fn collect_list_item(item: &Value, out: &mut FieldErrorsMap) {
    match item {
        Value::String(_) => {
            if let Some(msg) = non_empty_str(item) {
                push(out, NON_FIELD_ERRORS.to_string(), msg.to_string());
            }
        }
        Value::Object(obj) => {
            let loc = match obj.get("loc") {
                Some(Value::Array(loc)) => Some(loc),
                _ => None,
            };
            // Without a path, an item is only usable if it carries its own message.
            let msg = match (obj.get("msg").and_then(value_text), loc) {
                (Some(msg), _) => msg,
                (None, Some(_)) => DEFAULT_FIELD_MESSAGE.to_string(),
                (None, None) => return,
            };
            let key = loc.and_then(|loc| normalize_loc(loc));
            push(out, key.unwrap_or_else(|| NON_FIELD_ERRORS.to_string()), msg);
        }
        _ => {}
    }
}

fn collect_map_entry(field: &str, value: &Value, out: &mut FieldErrorsMap) {
    let field = field.trim();
    if field.is_empty() {
        return;
    }
    match value {
        Value::Array(items) => {
            for item in items {
                if let Some(msg) = map_message(item) {
                    push(out, field.to_string(), msg);
                }
            }
        }
        other => {
            if let Some(msg) = map_message(other) {
                push(out, field.to_string(), msg);
            }
        }
    }
}

fn map_message(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => obj.get("msg").and_then(value_text),
        other => value_text(other),
    }
}

/// Render a `loc` path as a field key. Returns `None` when nothing but scope
/// tokens remain.
fn normalize_loc(loc: &[Value]) -> Option<String> {
    let mut segments = loc.iter().peekable();
    if let Some(first) = segments.peek().and_then(|s| s.as_str()) {
        if SCOPE_TOKENS.contains(&first) {
            segments.next();
        }
    }

    let mut key = String::new();
    for segment in segments {
        match segment {
            Value::Number(n) => {
                if let Some(index) = n.as_u64() {
                    key.push_str(&format!("[{index}]"));
                }
            }
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    continue;
                }
                if !key.is_empty() {
                    key.push('.');
                }
                key.push_str(s);
            }
            _ => {}
        }
    }
    (!key.is_empty()).then_some(key)
}

fn push(out: &mut FieldErrorsMap, key: String, msg: String) {
    out.entry(key).or_default().push(msg);
}
