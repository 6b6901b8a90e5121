//! Canonical user-facing copy.

use crate::error::ErrorCode;

pub const CANCELED_MESSAGE: &str = "Request was canceled.";
pub const DEFAULT_FALLBACK: &str = "Something went wrong. Please try again.";

/// Canonical phrase for a code.
pub fn code_phrase(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::InvalidCredentials => "Invalid email or password.",
        ErrorCode::EmailNotVerified => "Please verify your email address before signing in.",
        ErrorCode::MfaRequired => "Enter your verification code to continue.",
        ErrorCode::TokenExpired => "Your session has expired. Please sign in again.",
        ErrorCode::TokenInvalid => "Your session is no longer valid. Please sign in again.",
        ErrorCode::NeedStepUp => "Please confirm your identity to continue.",
        ErrorCode::RateLimited => "Too many requests. Please slow down.",
        ErrorCode::Unauthorized => "Please sign in to continue.",
        ErrorCode::Forbidden => "You don't have permission to do that.",
        ErrorCode::BadRequest => "The request was invalid.",
        ErrorCode::NotFound => "We couldn't find what you were looking for.",
        ErrorCode::Conflict => "This conflicts with an existing item.",
        ErrorCode::ValidationError => "Some fields need your attention.",
        ErrorCode::ServerError => "Something went wrong on our end. Please try again later.",
        ErrorCode::NetworkError => "Network error. Check your connection and try again.",
        ErrorCode::Timeout => "The request timed out. Please try again.",
        ErrorCode::UnknownError => "An unexpected error occurred.",
    }
}

/// Built-in text for a status code.
pub fn status_phrase(status: u16) -> Option<&'static str> {
    let text = match status {
        400 => "The request was invalid.",
        401 => "Please sign in to continue.",
        403 => "You don't have permission to do that.",
        404 => "We couldn't find what you were looking for.",
        409 => "This conflicts with an existing item.",
        413 => "The upload is too large.",
        415 => "This file type isn't supported.",
        422 => "Some fields need your attention.",
        429 => "Too many requests. Please slow down.",
        500 => "Something went wrong on our end. Please try again later.",
        502 => "The server is unreachable right now. Please try again.",
        503 => "The service is temporarily unavailable. Please try again later.",
        504 => "The server took too long to respond. Please try again.",
        _ => return None,
    };
    Some(text)
}

pub fn retry_suffix(seconds: u64) -> String {
    format!(" Try again in {seconds}s.")
}
