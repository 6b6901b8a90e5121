//! Display-string shaping.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex must compile"));

const ELLIPSIS: char = '…';

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Cut `text` to at most `max_chars` characters, ending in an ellipsis when cut.
/// `max_chars == 0` disables truncation.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars - 1;
    let mut out: String = text.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push(ELLIPSIS);
    out
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
