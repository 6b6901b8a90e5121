//! Message configuration (layered: code > env > config file > defaults).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{OttError, Result};
use crate::format::{FormatOptions, DEFAULT_FALLBACK};
use crate::reauth::DEFAULT_REASON;

/// Global default config (lazy-initialized from env and the default file).
static DEFAULT_CONFIG: OnceLock<MessageConfig> = OnceLock::new();

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "OTT_ERRORS_CONFIG";

const ENV_FALLBACK: &str = "OTT_ERRORS_FALLBACK";
const ENV_INCLUDE_REQUEST_ID: &str = "OTT_ERRORS_INCLUDE_REQUEST_ID";
const ENV_MASK_SERVER_ERRORS: &str = "OTT_ERRORS_MASK_SERVER_ERRORS";
const ENV_PREFER_CODE_COPY: &str = "OTT_ERRORS_PREFER_CODE_COPY";
const ENV_MAX_LENGTH: &str = "OTT_ERRORS_MAX_LENGTH";
const ENV_REAUTH_REASON: &str = "OTT_ERRORS_REAUTH_REASON";

/// Copy and formatting settings shared by every call site.
///
/// A TOML file looks like:
///
/// ```toml
/// fallback = "Something broke."
/// max_length = 200
///
/// [status_messages]
/// 404 = "That title is no longer available."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub fallback: String,
    pub include_request_id: bool,
    pub mask_server_errors: bool,
    pub prefer_code_copy: bool,
    pub max_length: usize,
    pub reauth_reason: String,
    /// Status code (as a string key) to override text.
    pub status_messages: BTreeMap<String, String>,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK.to_string(),
            include_request_id: true,
            mask_server_errors: true,
            prefer_code_copy: true,
            max_length: crate::format::options::DEFAULT_MAX_LENGTH,
            reauth_reason: DEFAULT_REASON.to_string(),
            status_messages: BTreeMap::new(),
        }
    }
}

impl MessageConfig {
    /// Parse a TOML document. Status keys must be HTTP status codes.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; a missing file is not an error.
    pub fn load_file(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Self::from_toml_str(&raw).map(Some)
    }

    /// `~/.ott-errors/messages.toml`, or `$OTT_ERRORS_CONFIG` when set.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".ott-errors"))
            .unwrap_or_else(|| PathBuf::from(".ott-errors"))
            .join("messages.toml")
    }

    /// Defaults, then the default config file, then environment overrides.
    ///
    /// An unreadable config file is logged and skipped.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let path = Self::default_path();
        let base = match Self::load_file(&path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable message config");
                Self::default()
            }
        };
        base.with_env_overrides()
    }

    /// Get (or create) the global default config.
    pub fn global() -> &'static MessageConfig {
        DEFAULT_CONFIG.get_or_init(Self::from_env)
    }

    /// Apply `OTT_ERRORS_*` variables on top of this config. Unparseable
    /// values are logged and ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(fallback) = std::env::var(ENV_FALLBACK) {
            if !fallback.trim().is_empty() {
                self.fallback = fallback;
            }
        }
        if let Some(value) = env_bool(ENV_INCLUDE_REQUEST_ID) {
            self.include_request_id = value;
        }
        if let Some(value) = env_bool(ENV_MASK_SERVER_ERRORS) {
            self.mask_server_errors = value;
        }
        if let Some(value) = env_bool(ENV_PREFER_CODE_COPY) {
            self.prefer_code_copy = value;
        }
        if let Ok(raw) = std::env::var(ENV_MAX_LENGTH) {
            match raw.trim().parse() {
                Ok(value) => self.max_length = value,
                Err(_) => tracing::warn!(var = ENV_MAX_LENGTH, value = %raw, "ignoring invalid value"),
            }
        }
        if let Ok(reason) = std::env::var(ENV_REAUTH_REASON) {
            if !reason.trim().is_empty() {
                self.reauth_reason = reason;
            }
        }
        self
    }

    /// Options for [`crate::format::format_message`].
    pub fn format_options(&self) -> FormatOptions {
        let status_messages = self
            .status_messages
            .iter()
            .filter_map(|(status, text)| Some((status.trim().parse::<u16>().ok()?, text.clone())))
            .collect();
        FormatOptions::builder()
            .include_request_id(self.include_request_id)
            .fallback(self.fallback.clone())
            .status_messages(status_messages)
            .mask_server_errors(self.mask_server_errors)
            .prefer_code_copy(self.prefer_code_copy)
            .max_length(self.max_length)
            .build()
    }

    fn validate(&self) -> Result<()> {
        for status in self.status_messages.keys() {
            match status.trim().parse::<u16>() {
                Ok(code) if (100..=599).contains(&code) => {}
                _ => {
                    return Err(OttError::Configuration(format!(
                        "status_messages key '{status}' is not an HTTP status code"
                    )))
                }
            }
        }
        Ok(())
    }
}

fn env_bool(var: &str) -> Option<bool> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(var, value = %raw, "ignoring invalid boolean");
            None
        }
    }
}
