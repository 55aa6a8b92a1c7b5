//! Helpers for logging, slugs and dates.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

/// Truncate a string for logging purposes.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// The original string if it fits, otherwise the first `max` bytes (backing
/// off to a char boundary) with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Convert a title to a URL slug.
///
/// Lowercases, turns every run of characters outside `[a-z0-9]` into a
/// single `-`, and trims dashes from both ends.
///
/// # Arguments
///
/// * `title` - The article title
///
/// # Returns
///
/// The slug. Empty when the title has no ASCII letters or digits; callers
/// that need a key should fall back to something else.
///
/// ```ignore
/// assert_eq!(
///     slugify_title("CRISPR: The Gene Editing Revolution"),
///     "crispr-the-gene-editing-revolution"
/// );
/// ```
pub fn slugify_title(title: &str) -> String {
    NON_SLUG_RUN
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().date_naive().to_string()
}
