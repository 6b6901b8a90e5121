//! ott-errors: client-side error interpretation for the OTT web front end.
//!
//! Turns failures surfaced by the HTTP client into user-safe display text,
//! field-level validation messages, and step-up re-authentication decisions.
//! Every classifier is a pure function over an already-received error.
//!
//! # Quick Start
//!
//! ```
//! use ott_errors::prelude::*;
//!
//! let err: ClientError = UnifiedError::builder()
//!     .status(401)
//!     .code(ErrorCode::NeedStepUp)
//!     .request_id("req-42")
//!     .build()
//!     .into();
//!
//! assert_eq!(
//!     format_message(&err, &FormatOptions::default()),
//!     "Please confirm your identity to continue. (ref: req-42)"
//! );
//! assert!(classify(&err).required);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod prelude;
pub mod reauth;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
