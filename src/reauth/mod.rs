//! Step-up re-authentication signal interpretation.
//!
//! [`classify`] decides whether a failure means "prove it's you again" and,
//! if so, which method to prompt for. Structured errors are read from their
//! code and problem body; raw legacy responses from the `X-Reauth*` and
//! `WWW-Authenticate` headers.

pub mod challenge;
mod legacy;
mod method;

pub use challenge::{parse_www_authenticate, ChallengeParams};

use serde::Serialize;
use serde_json::json;
use strum::{Display, EnumString};

use crate::error::{ClientError, Meta, UnifiedError};
use crate::util::text::contains_ignore_case;
use crate::util::value::{coerce_seconds, non_empty_str};

use method::{infer_method, MethodHints};

/// Generic prompt text when the server gives no reason.
pub const DEFAULT_REASON: &str = "Please confirm your identity to continue.";

const REAUTH_TYPE_MARKERS: [&str; 4] = [
    "reauth",
    "step_up",
    "step-up",
    "insufficient_user_authentication",
];

/// How the user should re-authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReauthMethod {
    Password,
    Mfa,
    Any,
    #[default]
    Unknown,
}

/// Outcome of [`classify`].
///
/// When `required` is false callers must not prompt, whatever else is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReauthInfo {
    pub required: bool,
    pub method: ReauthMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Raw signals, for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Meta>,
}

impl ReauthInfo {
    pub fn not_required() -> Self {
        Self::default()
    }
}

/// Decide whether `err` asks for step-up re-authentication.
///
/// ```
/// use ott_errors::error::{ClientError, ErrorCode, UnifiedError};
/// use ott_errors::reauth::classify;
///
/// let meta = serde_json::json!({"expiresIn": "120"});
/// let err: ClientError = UnifiedError::builder()
///     .status(401)
///     .code(ErrorCode::NeedStepUp)
///     .meta(meta.as_object().unwrap().clone())
///     .build()
///     .into();
/// let info = classify(&err);
/// assert!(info.required);
/// assert_eq!(info.expires_in_seconds, Some(120));
/// ```
pub fn classify(err: &ClientError) -> ReauthInfo {
    match err {
        ClientError::Api(unified) => classify_unified(unified),
        ClientError::Legacy(legacy) => legacy::classify_legacy(legacy),
        _ => ReauthInfo::not_required(),
    }
}

pub fn is_reauth_required(err: &ClientError) -> bool {
    classify(err).required
}

pub fn pick_method(err: &ClientError) -> ReauthMethod {
    classify(err).method
}

/// The server's reason for the prompt, or `fallback` (default [`DEFAULT_REASON`]).
pub fn reason(err: &ClientError, fallback: Option<&str>) -> String {
    classify(err)
        .reason
        .unwrap_or_else(|| fallback.unwrap_or(DEFAULT_REASON).to_string())
}

pub(crate) fn is_reauth_type(problem_type: &str) -> bool {
    REAUTH_TYPE_MARKERS
        .iter()
        .any(|marker| contains_ignore_case(problem_type, marker))
}

fn classify_unified(err: &UnifiedError) -> ReauthInfo {
    let problem = err.problem();
    let problem_type = problem.as_ref().and_then(|p| p.problem_type.as_deref());

    let primary = err.code().is_some_and(|code| code.is_step_up());
    let secondary = matches!(err.status(), Some(401 | 403)) && problem_type.is_some_and(is_reauth_type);
    if !primary && !secondary {
        return ReauthInfo::not_required();
    }

    let explicit = ["method", "reauthMethod", "reauth_method"]
        .iter()
        .find_map(|key| err.meta_str(key));
    let fallback = if primary {
        ReauthMethod::Any
    } else {
        ReauthMethod::Unknown
    };
    let method = infer_method(
        &MethodHints {
            explicit,
            challenge: None,
            problem: problem.as_ref(),
        },
        fallback,
    );

    let reason = problem
        .as_ref()
        .and_then(|p| p.detail.clone().or_else(|| p.title.clone()))
        .or_else(|| err.meta_str("hint").map(str::to_string));

    let expires_in_seconds = ["expiresIn", "expires_in"]
        .iter()
        .find_map(|key| err.meta_value(key))
        .and_then(coerce_seconds);

    tracing::debug!(
        status = ?err.status(),
        primary,
        method = %method,
        "re-auth signal"
    );

    let mut source = Meta::new();
    source.insert("path".into(), json!("unified"));
    if let Some(code) = err.code() {
        source.insert("code".into(), json!(code));
    }
    if let Some(status) = err.status() {
        source.insert("status".into(), json!(status));
    }
    if let Some(kind) = err.meta_value("type").and_then(non_empty_str) {
        source.insert("problemType".into(), json!(kind));
    }

    ReauthInfo {
        required: true,
        method,
        reason,
        expires_in_seconds,
        request_id: err.request_id().map(str::to_string),
        source: Some(source),
    }
}
