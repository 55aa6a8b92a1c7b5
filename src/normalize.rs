//! Repair and parse raw text-provider output.
//!
//! Providers are asked for a bare JSON object but regularly wrap it in a
//! fenced code block, or ignore the instruction entirely. Normalization
//! never fails: output that does not parse is kept as the article body.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::categories::CategorySet;

const FENCE: &str = "```";

/// A language tag filling the rest of the opening fence line, e.g. `json`.
static FENCE_LANGUAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_+.-]*$").expect("static regex"));

/// Outcome of normalizing a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The text parsed as JSON. Missing or non-string fields are empty.
    Parsed { category: String, content: String },
    /// The text was not JSON; it is kept whole as the body.
    Fallback { raw_text: String, parse_error: String },
}

/// Body and (not yet validated) category extracted from a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFields {
    pub content: String,
    pub category: String,
}

impl Normalized {
    pub fn parse_error(&self) -> Option<&str> {
        match self {
            Self::Parsed { .. } => None,
            Self::Fallback { parse_error, .. } => Some(parse_error),
        }
    }

    /// Flatten into fields; a fallback takes the first allowed category.
    pub fn into_fields(self, categories: &CategorySet) -> DraftFields {
        match self {
            Self::Parsed { category, content } => DraftFields { content, category },
            Self::Fallback { raw_text, .. } => DraftFields {
                content: raw_text,
                category: categories.first().name.clone(),
            },
        }
    }
}

/// Remove a surrounding fenced code block, with or without a language tag.
///
/// A language tag is only recognized when it is alone on the opening fence
/// line; text that follows the fence on the same line is content. Text that
/// does not start with a fence is only trimmed.
///
/// # Returns
///
/// A trimmed slice of `raw` with the fence markers removed.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };
    let rest = match rest.split_once('\n') {
        Some((tag, body)) if FENCE_LANGUAGE.is_match(tag.trim_end()) => body,
        _ => rest,
    };
    rest.strip_suffix(FENCE).unwrap_or(rest).trim()
}

/// Normalize raw provider output into a [`Normalized`] outcome.
///
/// # Arguments
///
/// * `raw` - The text exactly as the provider returned it
///
/// # Returns
///
/// [`Normalized::Parsed`] when the fence-stripped text is JSON, with
/// missing or non-string `category`/`content` fields read as empty.
/// Otherwise [`Normalized::Fallback`] carrying the stripped text and the
/// parse error.
pub fn normalize_response(raw: &str) -> Normalized {
    let text = strip_code_fence(raw);
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Normalized::Parsed {
            category: string_field(&value, "category"),
            content: string_field(&value, "content"),
        },
        Err(e) => Normalized::Fallback {
            raw_text: text.to_string(),
            parse_error: e.to_string(),
        },
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
