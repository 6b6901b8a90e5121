//! Lenient problem-detail (RFC 7807 style) view over an error payload.

use serde_json::Value;

use super::unified::Meta;
use crate::util::value::non_empty_str;

/// Validation errors carried in a problem body.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemErrors {
    /// Ordered `{loc, msg}` items (or bare strings).
    List(Vec<Value>),
    /// Field name to message(s).
    Map(Meta),
}

impl ProblemErrors {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }

    /// First human-readable message found, in document order.
    pub fn first_message(&self) -> Option<String> {
        match self {
            Self::List(items) => items.iter().find_map(message_of),
            Self::Map(map) => map.values().find_map(|value| match value {
                Value::Array(items) => items.iter().find_map(message_of),
                other => message_of(other),
            }),
        }
    }
}

/// Problem-detail fields pulled out of `meta`.
///
/// Non-string values for the text fields are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProblemDetail {
    pub problem_type: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub errors: Option<ProblemErrors>,
}

impl ProblemDetail {
    pub fn from_meta(meta: &Meta) -> Self {
        let text = |key: &str| meta.get(key).and_then(non_empty_str).map(str::to_string);
        let errors = match meta.get("errors") {
            Some(Value::Array(items)) => Some(ProblemErrors::List(items.clone())),
            Some(Value::Object(map)) => Some(ProblemErrors::Map(map.clone())),
            _ => None,
        };
        Self {
            problem_type: text("type"),
            title: text("title"),
            detail: text("detail"),
            code: text("code"),
            message: text("message"),
            error: text("error"),
            errors,
        }
    }

    /// Parse from an arbitrary JSON body; non-objects yield `None`.
    pub fn from_value(body: &Value) -> Option<Self> {
        body.as_object().map(Self::from_meta)
    }

    /// The most specific human message available:
    /// `detail`, `title`, `message`/`error`, then the first validation message.
    pub fn human_message(&self) -> Option<String> {
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
            .or_else(|| self.errors.as_ref().and_then(ProblemErrors::first_message))
    }

    /// `type`, `title` and `detail`, in that order, for keyword scans.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        [&self.problem_type, &self.title, &self.detail]
            .into_iter()
            .filter_map(|s| s.as_deref())
    }
}

fn message_of(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => non_empty_str(value).map(str::to_string),
        Value::Object(obj) => obj.get("msg").and_then(non_empty_str).map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Meta {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn prefers_detail_over_title() {
        let problem = ProblemDetail::from_meta(&meta(json!({
            "title": "Bad Request",
            "detail": "Email is already taken",
        })));
        assert_eq!(problem.human_message().as_deref(), Some("Email is already taken"));
    }

    #[test]
    fn falls_back_to_first_list_error() {
        let problem = ProblemDetail::from_meta(&meta(json!({
            "errors": [42, {"loc": ["body", "email"]}, {"msg": "Too short"}],
        })));
        assert_eq!(problem.human_message().as_deref(), Some("Too short"));
    }

    #[test]
    fn map_errors_yield_first_message() {
        let problem = ProblemDetail::from_meta(&meta(json!({
            "errors": {"name": ["Required"]},
        })));
        assert_eq!(problem.human_message().as_deref(), Some("Required"));
    }

    #[test]
    fn ignores_non_string_fields() {
        let problem = ProblemDetail::from_meta(&meta(json!({"detail": 5, "title": " "})));
        assert_eq!(problem.human_message(), None);
    }
}
