//! CLI for inspecting how an error will be presented.

use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::MessageConfig;
use crate::error::{ClientError, OttError, Result};
use crate::format::{extract_field_errors, format_message};
use crate::reauth::{classify, parse_www_authenticate};

/// Inspect error copy and re-auth decisions.
#[derive(Parser, Debug)]
#[command(name = "ott-errors", version, about = "Inspect error copy and step-up decisions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the user-facing message for an error
    Format(FormatArgs),
    /// Print the re-authentication decision as JSON
    Reauth(InputArgs),
    /// Print field-level validation errors as JSON
    Fields(InputArgs),
    /// Parse a WWW-Authenticate header value
    Challenge(ChallengeArgs),
}

/// Where to read the JSON error from.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// JSON file holding the error (`-` or omitted reads stdin)
    pub input: Option<PathBuf>,
}

/// Arguments for `ott-errors format`.
#[derive(Args, Debug)]
pub struct FormatArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Maximum message length (0 disables truncation)
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Do not append the request id
    #[arg(long)]
    pub no_request_id: bool,

    /// Show server detail for 5xx responses
    #[arg(long)]
    pub show_server_detail: bool,

    /// Prefer server detail over canonical copy
    #[arg(long)]
    pub no_code_copy: bool,

    /// Fallback text
    #[arg(long)]
    pub fallback: Option<String>,
}

/// Arguments for `ott-errors challenge`.
#[derive(Args, Debug)]
pub struct ChallengeArgs {
    /// Header value, e.g. `Bearer error="insufficient_user_authentication"`
    pub header: String,
}

/// Run a command and return what should be printed.
pub fn run(command: Commands, config: &MessageConfig) -> Result<String> {
    match command {
        Commands::Format(args) => {
            let err = read_error(&args.input)?;
            let mut options = config.format_options();
            if let Some(max) = args.max_length {
                options.max_length = max;
            }
            if args.no_request_id {
                options.include_request_id = false;
            }
            if args.show_server_detail {
                options.mask_server_errors = false;
            }
            if args.no_code_copy {
                options.prefer_code_copy = false;
            }
            if let Some(fallback) = args.fallback {
                options.fallback = fallback;
            }
            Ok(format_message(&err, &options))
        }
        Commands::Reauth(args) => {
            let err = read_error(&args)?;
            let mut info = classify(&err);
            if info.required && info.reason.is_none() {
                info.reason = Some(config.reauth_reason.clone());
            }
            Ok(serde_json::to_string_pretty(&info)?)
        }
        Commands::Fields(args) => {
            let err = read_error(&args)?;
            Ok(serde_json::to_string_pretty(&extract_field_errors(&err))?)
        }
        Commands::Challenge(args) => Ok(serde_json::to_string_pretty(&parse_www_authenticate(
            &args.header,
        ))?),
    }
}

/// Parse a tagged JSON error, e.g. `{"kind": "api", "status": 429, ...}`.
pub fn parse_error(raw: &str) -> Result<ClientError> {
    if raw.trim().is_empty() {
        return Err(OttError::InvalidArgument("empty error input".to_string()));
    }
    Ok(serde_json::from_str(raw)?)
}

fn read_error(args: &InputArgs) -> Result<ClientError> {
    let raw = match &args.input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_error(&raw)
}
