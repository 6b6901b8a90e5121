//! Options controlling [`format_message`](super::format_message).

use std::collections::BTreeMap;

use bon::Builder;

use super::copy::DEFAULT_FALLBACK;

/// Default cap on the message body, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 300;

/// How a caught error is turned into display text.
///
/// ```
/// use ott_errors::format::FormatOptions;
///
/// let options = FormatOptions::builder()
///     .include_request_id(false)
///     .max_length(120)
///     .build();
/// assert!(options.mask_server_errors);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct FormatOptions {
    /// Append `" (ref: <id>)"` when the error carries a request id.
    #[builder(default = true)]
    pub include_request_id: bool,
    /// Text used when nothing more specific is available.
    #[builder(default = DEFAULT_FALLBACK.to_string(), into)]
    pub fallback: String,
    /// Per-status overrides, consulted before the built-in status table.
    #[builder(default)]
    pub status_messages: BTreeMap<u16, String>,
    /// Hide server-provided detail for 5xx responses.
    #[builder(default = true)]
    pub mask_server_errors: bool,
    /// Prefer canonical copy for known codes over server-provided detail.
    #[builder(default = true)]
    pub prefer_code_copy: bool,
    /// Cap on the message body in characters; 0 disables truncation.
    #[builder(default = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FormatOptions {
    pub fn with_status_message(mut self, status: u16, message: impl Into<String>) -> Self {
        self.status_messages.insert(status, message.into());
        self
    }
}
