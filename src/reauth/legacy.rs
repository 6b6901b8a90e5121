//! Header-driven step-up detection for raw HTTP responses.

use serde_json::{json, Value};

use crate::error::{ErrorCode, LegacyHttpError, Meta};
use crate::http::headers::*;
use crate::util::text::contains_ignore_case;
use crate::util::value::{coerce_seconds_str, non_empty_str};

use super::challenge::{parse_all, ChallengeParams};
use super::method::{infer_method, MethodHints};
use super::{is_reauth_type, ReauthInfo, ReauthMethod};

const CHALLENGE_ERROR_MARKERS: [&str; 3] = [
    "insufficient_user_authentication",
    "mfa_required",
    "step_up_required",
];

pub(super) fn classify_legacy(err: &LegacyHttpError) -> ReauthInfo {
    let problem = err.problem();
    let challenge_values = err.header_all(WWW_AUTHENTICATE);
    let challenge: Option<ChallengeParams> =
        (!challenge_values.is_empty()).then(|| parse_all(challenge_values.iter().copied()));

    let reauth_header = err.header(X_REAUTH);
    let primary = reauth_header.is_some_and(|value| value.eq_ignore_ascii_case("required"))
        || err
            .legacy_code()
            .is_some_and(|code| ErrorCode::from_wire(code).is_step_up());

    let secondary = !primary
        && matches!(err.status(), 401 | 403)
        && (problem
            .as_ref()
            .and_then(|p| p.problem_type.as_deref())
            .is_some_and(is_reauth_type)
            || challenge.as_ref().is_some_and(challenge_demands_reauth));

    if !primary && !secondary {
        return ReauthInfo::not_required();
    }

    let fallback = if primary {
        ReauthMethod::Any
    } else {
        ReauthMethod::Unknown
    };
    let method = infer_method(
        &MethodHints {
            explicit: err.header(X_REAUTH_METHOD),
            challenge: challenge.as_ref(),
            problem: problem.as_ref(),
        },
        fallback,
    );

    let expires_in_seconds = err
        .header(X_REAUTH_EXPIRES_IN)
        .and_then(coerce_seconds_str)
        .or_else(|| err.header(X_REAUTH_TTL).and_then(coerce_seconds_str));

    let reason = problem
        .as_ref()
        .and_then(|p| p.detail.clone().or_else(|| p.title.clone()))
        .or_else(|| {
            err.body()?
                .get("hint")
                .and_then(non_empty_str)
                .map(str::to_string)
        });

    let request_id = err
        .header(X_REAUTH_ID)
        .or_else(|| err.header(X_REQUEST_ID))
        .map(str::to_string);

    tracing::debug!(
        status = err.status(),
        primary,
        method = %method,
        "legacy re-auth signal"
    );

    let mut source = Meta::new();
    source.insert("path".into(), json!("legacy"));
    source.insert("status".into(), json!(err.status()));
    if let Some(value) = reauth_header {
        source.insert("xReauth".into(), json!(value));
    }
    if let Some(value) = err.header(X_REAUTH_METHOD) {
        source.insert("xReauthMethod".into(), json!(value));
    }
    if let Some(code) = err.legacy_code() {
        source.insert("code".into(), json!(code));
    }
    if let Some(params) = &challenge {
        source.insert("wwwAuthenticate".into(), json!(params));
    }
    if let Some(Value::String(kind)) = err.body().and_then(|b| b.get("type")) {
        source.insert("problemType".into(), json!(kind));
    }

    ReauthInfo {
        required: true,
        method,
        reason,
        expires_in_seconds,
        request_id,
        source: Some(source),
    }
}

fn challenge_demands_reauth(params: &ChallengeParams) -> bool {
    let error_hit = params.get("error").is_some_and(|error| {
        CHALLENGE_ERROR_MARKERS
            .iter()
            .any(|marker| contains_ignore_case(error, marker))
    });
    let prompt_hit = params
        .get("prompt")
        .is_some_and(|prompt| contains_ignore_case(prompt, "login"));
    error_hit || prompt_hit
}
