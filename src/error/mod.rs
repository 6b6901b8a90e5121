//! Error values consumed by the classifiers, and the crate's own error type.

pub mod legacy;
pub mod problem;
pub mod unified;

pub use legacy::LegacyHttpError;
pub use problem::{ProblemDetail, ProblemErrors};
pub use unified::{ErrorCode, Meta, UnifiedError};

use serde::Deserialize;
use thiserror::Error;

/// A caught failure, tagged by where it came from.
///
/// The HTTP boundary (see [`crate::http`]) produces these; the `format` and
/// `reauth` classifiers pattern-match on the variant instead of probing shapes.
#[derive(Error, Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientError {
    #[error("Request aborted")]
    Aborted {
        #[serde(default)]
        reason: Option<String>,
    },

    #[error("{0}")]
    Api(UnifiedError),

    #[error("{0}")]
    Legacy(LegacyHttpError),

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("{message}")]
    Generic { message: String },

    #[error("Unknown error")]
    Unknown,
}

/// Broad error category for routing UI behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Cancelled,
    Authentication,
    RateLimit,
    Validation,
    Network,
    Timeout,
    Server,
    Application,
    Unknown,
}

impl ClientError {
    pub fn aborted() -> Self {
        Self::Aborted { reason: None }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// The structured error, if this is one.
    pub fn as_unified(&self) -> Option<&UnifiedError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Aborted { .. } => ErrorCategory::Cancelled,
            Self::Network { .. } => ErrorCategory::Network,
            Self::Api(err) => unified_category(err),
            Self::Legacy(err) => unified_category(&err.to_unified()),
            Self::Generic { .. } | Self::Unknown => ErrorCategory::Unknown,
        }
    }

    /// Whether repeating the request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }
}

fn unified_category(err: &UnifiedError) -> ErrorCategory {
    use ErrorCode::*;

    match err.code() {
        Some(InvalidCredentials | EmailNotVerified | MfaRequired | TokenExpired | TokenInvalid)
        | Some(NeedStepUp | Unauthorized | Forbidden) => ErrorCategory::Authentication,
        Some(RateLimited) => ErrorCategory::RateLimit,
        Some(ValidationError | BadRequest) => ErrorCategory::Validation,
        Some(NetworkError) => ErrorCategory::Network,
        Some(Timeout) => ErrorCategory::Timeout,
        Some(ServerError) => ErrorCategory::Server,
        Some(NotFound | Conflict) => ErrorCategory::Application,
        Some(UnknownError) | None => match err.status() {
            Some(401 | 403) => ErrorCategory::Authentication,
            Some(429) => ErrorCategory::RateLimit,
            Some(400 | 422) => ErrorCategory::Validation,
            Some(408 | 504) => ErrorCategory::Timeout,
            Some(500..=599) => ErrorCategory::Server,
            Some(_) => ErrorCategory::Application,
            None => ErrorCategory::Unknown,
        },
    }
}

impl From<UnifiedError> for ClientError {
    fn from(err: UnifiedError) -> Self {
        Self::Api(err)
    }
}

impl From<LegacyHttpError> for ClientError {
    fn from(err: LegacyHttpError) -> Self {
        Self::Legacy(err)
    }
}

impl From<&str> for ClientError {
    fn from(message: &str) -> Self {
        Self::generic(message)
    }
}

impl From<String> for ClientError {
    fn from(message: String) -> Self {
        Self::generic(message)
    }
}

/// Failures in the crate's own setup paths (configuration, CLI input).
/// Classification itself never fails.
#[derive(Error, Debug)]
pub enum OttError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, OttError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_is_cancelled_and_not_retryable() {
        let err = ClientError::aborted();
        assert_eq!(err.category(), ErrorCategory::Cancelled);
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_status_without_code_is_retryable() {
        let err = ClientError::from(UnifiedError::builder().status(502).build());
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.is_retryable());
    }

    #[test]
    fn step_up_code_is_authentication() {
        let err = ClientError::from(
            UnifiedError::builder()
                .status(401)
                .code(ErrorCode::NeedStepUp)
                .build(),
        );
        assert_eq!(err.category(), ErrorCategory::Authentication);
        assert!(!err.is_retryable());
    }

    #[test]
    fn every_category_is_reachable() {
        let api = |status: Option<u16>, code: Option<ErrorCode>| {
            ClientError::from(UnifiedError::builder().maybe_status(status).maybe_code(code).build())
        };
        let cases = [
            (ClientError::aborted(), ErrorCategory::Cancelled),
            (api(Some(403), None), ErrorCategory::Authentication),
            (api(None, Some(ErrorCode::RateLimited)), ErrorCategory::RateLimit),
            (api(Some(422), None), ErrorCategory::Validation),
            (ClientError::network("offline"), ErrorCategory::Network),
            (api(Some(408), None), ErrorCategory::Timeout),
            (api(None, Some(ErrorCode::ServerError)), ErrorCategory::Server),
            (api(Some(404), Some(ErrorCode::NotFound)), ErrorCategory::Application),
            (api(None, None), ErrorCategory::Unknown),
            (ClientError::Unknown, ErrorCategory::Unknown),
        ];
        for (err, expected) in cases {
            assert_eq!(err.category(), expected, "{err:?}");
        }
    }

    #[test]
    fn deserializes_tagged_variants() {
        let err: ClientError = serde_json::from_value(serde_json::json!({
            "kind": "api",
            "status": 429,
            "code": "rate_limited",
        }))
        .unwrap();
        assert_eq!(err.category(), ErrorCategory::RateLimit);

        let err: ClientError =
            serde_json::from_value(serde_json::json!({"kind": "aborted"})).unwrap();
        assert!(matches!(err, ClientError::Aborted { reason: None }));
    }

    #[test]
    fn string_converts_to_generic() {
        let err = ClientError::from("boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.category(), ErrorCategory::Unknown);
    }
}
