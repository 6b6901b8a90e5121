//! HTTP boundary: turns responses and transport failures into [`ClientError`] values.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;

use crate::error::{ClientError, ErrorCode, LegacyHttpError, Meta, UnifiedError};
use crate::util::value::{coerce_seconds, coerce_seconds_str, non_empty_str};

/// Header names understood by this crate. Lookups are case-insensitive.
pub mod headers {
    pub const X_REAUTH: &str = "x-reauth";
    pub const X_REAUTH_METHOD: &str = "x-reauth-method";
    pub const X_REAUTH_EXPIRES_IN: &str = "x-reauth-expires-in";
    pub const X_REAUTH_TTL: &str = "x-reauth-ttl";
    pub const X_REAUTH_ID: &str = "x-reauth-id";
    pub const X_REQUEST_ID: &str = "x-request-id";
    pub const X_CORRELATION_ID: &str = "x-correlation-id";
    pub const WWW_AUTHENTICATE: &str = "www-authenticate";
}

use self::headers::*;

/// Build a [`UnifiedError`] from the raw parts of a failed response.
///
/// A JSON object body becomes `meta`. `X-Reauth: required` forces
/// `need_step_up`; otherwise the code comes from `body.code` when it is a
/// known code, else it is inferred from the status.
pub fn unified_from_parts(status: u16, headers: &HeaderMap, body: &str) -> UnifiedError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    unified_from_value(status, headers, parsed.as_ref(), None)
}

/// Convert a legacy error into the structured shape, keeping its explicit code.
pub fn unified_from_legacy(err: &LegacyHttpError) -> UnifiedError {
    unified_from_value(err.status(), err.headers(), err.body(), err.legacy_code())
}

fn unified_from_value(
    status: u16,
    headers: &HeaderMap,
    body: Option<&Value>,
    explicit_code: Option<&str>,
) -> UnifiedError {
    let mut meta: Option<Meta> = body.and_then(Value::as_object).cloned();

    let wire_code = explicit_code.or_else(|| meta.as_ref()?.get("code").and_then(non_empty_str));
    let reauth_required = header_str(headers, X_REAUTH)
        .is_some_and(|value| value.eq_ignore_ascii_case("required"));
    let code = if reauth_required {
        ErrorCode::NeedStepUp
    } else {
        wire_code
            .and_then(|raw| raw.parse::<ErrorCode>().ok())
            .unwrap_or_else(|| ErrorCode::from_status(status))
    };

    let request_id = header_str(headers, X_REQUEST_ID)
        .or_else(|| header_str(headers, X_CORRELATION_ID))
        .or_else(|| meta_str(meta.as_ref(), &["requestId", "request_id"]))
        .map(str::to_string);

    let retry_after = header_str(headers, RETRY_AFTER.as_str())
        .and_then(|value| parse_retry_after(value, Utc::now()))
        .or_else(|| {
            let meta = meta.as_ref()?;
            ["retryAfter", "retry_after"]
                .iter()
                .find_map(|key| meta.get(*key).and_then(coerce_seconds))
        });

    if reauth_required || code.is_step_up() {
        carry_reauth_headers(headers, &mut meta);
    }

    UnifiedError::builder()
        .status(status)
        .code(code)
        .maybe_request_id(request_id)
        .maybe_retry_after(retry_after)
        .maybe_meta(meta)
        .build()
}

/// Copy step-up hints sent as headers into `meta` so the structured path sees them.
/// Values already present in the body win.
fn carry_reauth_headers(headers: &HeaderMap, meta: &mut Option<Meta>) {
    let method = header_str(headers, X_REAUTH_METHOD);
    let expires = header_str(headers, X_REAUTH_EXPIRES_IN).or_else(|| header_str(headers, X_REAUTH_TTL));
    if method.is_none() && expires.is_none() {
        return;
    }
    let meta = meta.get_or_insert_with(Meta::new);
    if let Some(method) = method {
        meta.entry("method")
            .or_insert_with(|| Value::String(method.to_string()));
    }
    if let Some(secs) = expires.and_then(coerce_seconds_str) {
        meta.entry("expiresIn").or_insert_with(|| Value::from(secs));
    }
}

/// Parse a `Retry-After` value: delta-seconds or an HTTP-date relative to `now`.
/// Dates in the past yield zero.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<u64> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = at.with_timezone(&Utc).signed_duration_since(now).num_seconds();
    Some(delta.max(0) as u64)
}

/// Read a failed response into a structured error.
pub async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            tracing::debug!(status, error = %err, "failed to read error body");
            String::new()
        }
    };
    ClientError::Api(unified_from_parts(status, &headers, &body))
}

/// Read a failed response for the header-driven compatibility path.
pub async fn legacy_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = match response.text().await {
        Ok(body) => serde_json::from_str::<Value>(&body).ok(),
        Err(err) => {
            tracing::debug!(status, error = %err, "failed to read error body");
            None
        }
    };
    let legacy = LegacyHttpError::new(status, headers);
    ClientError::Legacy(match body {
        Some(body) => legacy.with_body(body),
        None => legacy,
    })
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ClientError::Api(
                UnifiedError::builder()
                    .maybe_status(err.status().map(|s| s.as_u16()))
                    .code(ErrorCode::Timeout)
                    .build(),
            );
        }
        if let Some(status) = err.status() {
            let status = status.as_u16();
            return ClientError::Api(
                UnifiedError::builder()
                    .status(status)
                    .code(ErrorCode::from_status(status))
                    .build(),
            );
        }
        if err.is_connect() || err.is_request() {
            return ClientError::network(err.to_string());
        }
        ClientError::generic(err.to_string())
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn meta_str<'a>(meta: Option<&'a Meta>, keys: &[&str]) -> Option<&'a str> {
    let meta = meta?;
    keys.iter().find_map(|key| meta.get(*key).and_then(non_empty_str))
}
