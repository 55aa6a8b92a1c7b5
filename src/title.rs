//! Derive a display title from a formatted article body.
//!
//! Two stages, tried in order:
//! 1. the inner text of the first `<b>` span, trailing sentence punctuation
//!    removed;
//! 2. the first sentence of the body with all markup stripped.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static BOLD_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<b(?:\s[^>]*)?>(.*?)</b\s*>").expect("static regex"));

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("static regex"));

const SENTENCE_END: [char; 4] = ['.', '!', '?', '\n'];

/// Punctuation dropped from the end of a bold-span title.
const TITLE_TRAILERS: [char; 6] = ['.', '!', '?', ',', ';', ':'];

/// Extract a title from `body`.
///
/// # Arguments
///
/// * `body` - Article body in the `<b>`/`<i>`/`<u>`/`<br>` vocabulary
///
/// # Returns
///
/// The bold-span title, else the first sentence, else the trimmed body.
/// Empty only when `body` is blank.
pub fn extract_title(body: &str) -> String {
    bold_title(body)
        .or_else(|| first_sentence(body))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Stage 1: the first bold span, if it has any text left after trimming.
pub fn bold_title(body: &str) -> Option<String> {
    let inner = BOLD_SPAN.captures(body)?.get(1)?.as_str();
    let title = plain_text(inner)
        .trim_end_matches(|c: char| c.is_whitespace() || TITLE_TRAILERS.contains(&c))
        .trim()
        .to_string();
    (!title.is_empty()).then_some(title)
}

/// Stage 2: the first non-empty sentence or line of the unformatted body.
pub fn first_sentence(body: &str) -> Option<String> {
    plain_text(body)
        .split(SENTENCE_END)
        .map(str::trim)
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Strip inline markup, turning `<br>` into a newline.
pub fn plain_text(markup: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(markup, "\n");
    Html::parse_fragment(&with_breaks)
        .root_element()
        .text()
        .collect()
}
