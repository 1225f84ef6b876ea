//! Text normalization shared by skill extraction and feature building.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+").expect("valid URL pattern"));
static PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid punct pattern"));

/// Strips URLs, replaces punctuation with spaces, lowercases and trims.
///
/// Never fails: empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_urls = URL_RE.replace_all(text, "");
    let without_punct = PUNCT_RE.replace_all(&without_urls, " ");
    without_punct.to_lowercase().trim().to_string()
}

/// Whitespace-separated tokens of already-normalized text.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// Adjacent word pairs, e.g. `"a b c"` → `["a b", "b c"]`.
pub fn bigrams(normalized: &str) -> Vec<String> {
    let words = tokens(normalized);
    words
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

/// Truncates to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
