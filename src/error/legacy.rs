//! Raw HTTP failure as surfaced by the older header-driven client.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;

use super::problem::ProblemDetail;
use super::unified::UnifiedError;
use crate::util::value::non_empty_str;

/// A failed response that still carries its raw headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "LegacyWire")]
pub struct LegacyHttpError {
    status: u16,
    headers: HeaderMap,
    body: Option<Value>,
    code: Option<String>,
}

impl LegacyHttpError {
    pub fn new(status: u16, headers: HeaderMap) -> Self {
        Self {
            status,
            headers,
            body: None,
            code: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// First value of a header, trimmed. Non-UTF-8 and blank values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)?
            .to_str()
            .ok()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Every value of a header, in received order.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// The legacy `code` field, falling back to `body.code`.
    pub fn legacy_code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| self.body.as_ref()?.get("code").and_then(non_empty_str))
    }

    pub fn problem(&self) -> Option<ProblemDetail> {
        self.body.as_ref().and_then(ProblemDetail::from_value)
    }

    /// Convert into the structured shape used by the preferred path.
    pub fn to_unified(&self) -> UnifiedError {
        crate::http::unified_from_legacy(self)
    }
}

impl fmt::Display for LegacyHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(code) = self.legacy_code() {
            write!(f, " ({code})")?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct LegacyWire {
    status: u16,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: Option<Value>,
    #[serde(default)]
    code: Option<String>,
}

impl From<LegacyWire> for LegacyHttpError {
    fn from(wire: LegacyWire) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in wire.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => tracing::debug!(header = %name, "dropping unparseable header"),
            }
        }
        Self {
            status: wire.status,
            headers,
            body: wire.body,
            code: wire.code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let err: LegacyHttpError = serde_json::from_value(json!({
            "status": 401,
            "headers": {"X-Reauth": " required "},
        }))
        .unwrap();
        assert_eq!(err.header("x-reauth"), Some("required"));
    }

    #[test]
    fn legacy_code_falls_back_to_body() {
        let err = LegacyHttpError::new(403, HeaderMap::new())
            .with_body(json!({"code": "need_step_up"}));
        assert_eq!(err.legacy_code(), Some("need_step_up"));

        let err = err.with_code("other");
        assert_eq!(err.legacy_code(), Some("other"));
    }

    #[test]
    fn invalid_header_names_are_dropped() {
        let err: LegacyHttpError = serde_json::from_value(json!({
            "status": 400,
            "headers": {"bad header": "x", "X-Request-Id": "r1"},
        }))
        .unwrap();
        assert_eq!(err.headers().len(), 1);
        assert_eq!(err.to_string(), "HTTP 400");
    }
}
