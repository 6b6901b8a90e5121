//! Turning caught errors into user-safe display text.
//!
//! [`format_message`] resolves a single string for any [`ClientError`];
//! [`fields`] pulls per-field validation messages out of problem bodies and
//! [`step_up`] exposes the step-up helpers UI call sites use alongside it.

pub mod copy;
pub mod fields;
pub mod options;
pub mod step_up;

pub use copy::{CANCELED_MESSAGE, DEFAULT_FALLBACK};
pub use fields::{
    extract_field_errors, format_field_error, is_validation_error, FieldErrorsMap,
    NON_FIELD_ERRORS,
};
pub use options::FormatOptions;
pub use step_up::{get_reauth_meta, is_step_up_error, StepUpMeta};

use crate::error::{ClientError, ErrorCode, UnifiedError};
use crate::util::text::{collapse_whitespace, truncate_with_ellipsis};

use copy::{code_phrase, retry_suffix, status_phrase};

/// Resolve the display message for `err`.
///
/// Cancellation always yields [`CANCELED_MESSAGE`]. Structured errors go
/// through canonical code copy, then server problem detail (masked for 5xx
/// unless disabled), then status copy, then the `unknown_error` phrase. The result is whitespace-collapsed,
/// truncated to `max_length`, and suffixed with `" (ref: <id>)"` when a
/// request id is available and enabled.
///
/// ```
/// use ott_errors::error::{ClientError, ErrorCode, UnifiedError};
/// use ott_errors::format::{format_message, FormatOptions};
///
/// let err = ClientError::from(
///     UnifiedError::builder()
///         .status(429)
///         .code(ErrorCode::RateLimited)
///         .retry_after(30)
///         .build(),
/// );
/// let text = format_message(&err, &FormatOptions::default());
/// assert_eq!(text, "Too many requests. Please slow down. Try again in 30s.");
/// ```
pub fn format_message(err: &ClientError, options: &FormatOptions) -> String {
    let (body, request_id) = match err {
        ClientError::Aborted { .. } => return CANCELED_MESSAGE.to_string(),
        ClientError::Api(unified) => (
            unified_message(unified, options),
            unified.request_id().map(str::to_string),
        ),
        ClientError::Legacy(legacy) => {
            let unified = legacy.to_unified();
            (
                unified_message(&unified, options),
                unified.request_id().map(str::to_string),
            )
        }
        ClientError::Network { .. } => (code_phrase(ErrorCode::NetworkError).to_string(), None),
        ClientError::Generic { message } => (message.clone(), None),
        ClientError::Unknown => (options.fallback.clone(), None),
    };
    finish(&body, request_id.as_deref(), options)
}

/// [`format_message`] with default options.
pub fn format_error(err: &ClientError) -> String {
    format_message(err, &FormatOptions::default())
}

fn unified_message(err: &UnifiedError, options: &FormatOptions) -> String {
    let masked = options.mask_server_errors && err.is_server_error();
    if masked {
        tracing::debug!(status = ?err.status(), "masking server-provided error detail");
    }

    let code_copy = if options.prefer_code_copy {
        err.code().map(|code| code_phrase(code).to_string())
    } else {
        None
    };

    let mut message = code_copy
        .or_else(|| {
            if masked {
                None
            } else {
                err.problem().and_then(|problem| problem.human_message())
            }
        })
        .or_else(|| {
            let status = err.status()?;
            options
                .status_messages
                .get(&status)
                .cloned()
                .or_else(|| status_phrase(status).map(str::to_string))
        })
        .unwrap_or_else(|| code_phrase(ErrorCode::UnknownError).to_string());

    if err.is_rate_limited() {
        if let Some(secs) = err.retry_after().filter(|secs| *secs > 0) {
            message.push_str(&retry_suffix(secs));
        }
    }
    message
}

fn finish(body: &str, request_id: Option<&str>, options: &FormatOptions) -> String {
    let mut text = collapse_whitespace(body);
    if text.is_empty() {
        text = collapse_whitespace(&options.fallback);
    }
    let mut text = truncate_with_ellipsis(&text, options.max_length);
    if options.include_request_id {
        if let Some(id) = request_id.map(str::trim).filter(|id| !id.is_empty()) {
            text.push_str(&format!(" (ref: {id})"));
        }
    }
    text
}
