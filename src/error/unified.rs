//! The structured error value produced at the HTTP boundary.

use std::fmt;

use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use super::problem::ProblemDetail;

/// Free-form problem-detail payload forwarded from the server body.
pub type Meta = serde_json::Map<String, Value>;

/// Stable machine-readable error code.
///
/// The set is closed: anything the server sends that is not listed here is
/// read as [`ErrorCode::UnknownError`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ErrorCode {
    InvalidCredentials,
    EmailNotVerified,
    MfaRequired,
    TokenExpired,
    TokenInvalid,
    #[serde(alias = "step_up_required")]
    #[strum(to_string = "need_step_up", serialize = "step_up_required")]
    NeedStepUp,
    RateLimited,
    Unauthorized,
    Forbidden,
    BadRequest,
    NotFound,
    Conflict,
    ValidationError,
    ServerError,
    NetworkError,
    Timeout,
    UnknownError,
}

impl ErrorCode {
    /// Parse a code from the wire, mapping unrecognised values to `UnknownError`.
    pub fn from_wire(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::UnknownError)
    }

    /// Best-effort code for a bare HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            409 => Self::Conflict,
            422 => Self::ValidationError,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::UnknownError,
        }
    }

    pub fn is_step_up(self) -> bool {
        self == Self::NeedStepUp
    }
}

/// A failed request as reported by the HTTP client.
///
/// Values are immutable once built; use [`UnifiedError::builder`] or serde
/// (`requestId`, `retryAfter` keys) to construct one.
///
/// ```
/// use ott_errors::error::{ErrorCode, UnifiedError};
///
/// let err = UnifiedError::builder()
///     .status(429)
///     .code(ErrorCode::RateLimited)
///     .retry_after(30)
///     .build();
/// assert_eq!(err.retry_after(), Some(30));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Builder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(
        default,
        deserialize_with = "deserialize_code",
        skip_serializing_if = "Option::is_none"
    )]
    code: Option<ErrorCode>,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<Meta>,
}

impl UnifiedError {
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    /// Look up a raw value in `meta`.
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta.as_ref()?.get(key)
    }

    /// Look up a non-empty string in `meta`.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta_value(key)?
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Lenient problem-detail view over `meta`.
    pub fn problem(&self) -> Option<ProblemDetail> {
        self.meta.as_ref().map(ProblemDetail::from_meta)
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status, Some(500..=599))
    }

    pub fn is_rate_limited(&self) -> bool {
        self.code == Some(ErrorCode::RateLimited) || self.status == Some(429)
    }
}

impl fmt::Display for UnifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error")?;
        match (self.status, self.code) {
            (Some(status), Some(code)) => write!(f, " (status {status}, {code})")?,
            (Some(status), None) => write!(f, " (status {status})")?,
            (None, Some(code)) => write!(f, " ({code})")?,
            (None, None) => {}
        }
        if let Some(id) = &self.request_id {
            write!(f, " [request {id}]")?;
        }
        Ok(())
    }
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<Option<ErrorCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ErrorCode::from_wire))
}
