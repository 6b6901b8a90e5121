//! `WWW-Authenticate` challenge parameter parsing.

use std::collections::BTreeMap;

/// Flat, lower-cased parameter map of a challenge.
pub type ChallengeParams = BTreeMap<String, String>;

/// Parse the parameters of a `WWW-Authenticate` value.
///
/// The leading auth-scheme token is dropped, the rest is split on commas
/// outside double quotes, and each `key="value"` or `key=value` segment is
/// recorded under its lower-cased key. The first occurrence of a key wins.
/// Malformed segments are skipped.
///
/// ```
/// use ott_errors::reauth::parse_www_authenticate;
///
/// let params = parse_www_authenticate(
///     r#"Bearer error="insufficient_user_authentication", prompt="login""#,
/// );
/// assert_eq!(params["error"], "insufficient_user_authentication");
/// assert_eq!(params["prompt"], "login");
/// ```
pub fn parse_www_authenticate(header: &str) -> ChallengeParams {
    let mut params = ChallengeParams::new();
    for segment in split_unquoted_commas(strip_scheme(header.trim())) {
        match parse_param(segment) {
            Some((key, value)) => {
                params.entry(key).or_insert(value);
            }
            None if segment.trim().is_empty() => {}
            None => tracing::debug!(segment, "dropping malformed challenge parameter"),
        }
    }
    params
}

/// Parse and merge several header values; earlier values win on key clashes.
pub fn parse_all<'a>(values: impl IntoIterator<Item = &'a str>) -> ChallengeParams {
    let mut merged = ChallengeParams::new();
    for value in values {
        for (key, param) in parse_www_authenticate(value) {
            merged.entry(key).or_insert(param);
        }
    }
    merged
}

fn strip_scheme(header: &str) -> &str {
    match header.split_once(char::is_whitespace) {
        Some((scheme, rest)) if !scheme.contains('=') => rest.trim_start(),
        None if !header.contains('=') => "",
        _ => header,
    }
}

fn split_unquoted_commas(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                segments.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    segments.push(&input[start..]);
    segments
}

fn parse_param(segment: &str) -> Option<(String, String)> {
    let (key, value) = segment.trim().split_once('=')?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(is_token_char) {
        return None;
    }
    let value = value.trim();
    let value = if let Some(quoted) = value.strip_prefix('"') {
        unescape(quoted.strip_suffix('"')?)
    } else {
        if value.is_empty() || value.contains('"') || value.contains(char::is_whitespace) {
            return None;
        }
        value.to_string()
    };
    Some((key.to_ascii_lowercase(), value))
}

fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}
