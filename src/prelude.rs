//! Convenience re-exports for common use.

pub use crate::config::MessageConfig;
pub use crate::error::{ClientError, ErrorCategory, ErrorCode, OttError, Result, UnifiedError};
pub use crate::format::{
    extract_field_errors, format_field_error, format_message, get_reauth_meta,
    is_step_up_error, is_validation_error, FieldErrorsMap, FormatOptions,
};
pub use crate::reauth::{classify, is_reauth_required, pick_method, ReauthInfo, ReauthMethod};
