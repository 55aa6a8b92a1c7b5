//! Capability interfaces for the external services the pipeline talks to.
//!
//! The pipeline only sees these traits, so tests can substitute
//! deterministic fakes and provider request/response shapes stay inside
//! the concrete clients.
//!
//! # Implementations
//!
//! - [`gemini::GeminiClient`]: [`TextDrafter`] over the Gemini
//!   `generateContent` endpoint
//! - [`pexels::PexelsClient`]: [`ImageFinder`] over the Pexels photo search

use serde_json::Value;

use crate::error::{DraftError, ImageSearchError};

pub mod gemini;
pub mod pexels;

/// Something that can turn a rendered prompt into raw generated text.
pub trait TextDrafter {
    /// Send `prompt` to the provider and return its raw textual output.
    ///
    /// Exactly one attempt is made.
    ///
    /// # Errors
    ///
    /// - [`DraftError::ProviderUnavailable`] if the provider cannot be
    ///   reached or answers with a non-success status
    /// - [`DraftError::ProviderEmptyOutput`] if the answer carries no text
    async fn draft(&self, prompt: &str) -> Result<String, DraftError>;
}

/// Something that can search a stock-photo library.
pub trait ImageFinder {
    /// Return up to `per_page` photos matching `query`, in provider order.
    async fn search(&self, query: &str, per_page: u8) -> Result<Vec<Photo>, ImageSearchError>;
}

/// A photo record as returned by the stock-photo provider.
///
/// Only the fields the resolver needs are kept; everything is optional
/// because providers omit sizes freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Photo {
    pub id: Option<u64>,
    pub src: Option<PhotoSources>,
}

/// Size variants of a [`Photo`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoSources {
    pub large: Option<String>,
}

/// Read a photo entry leniently: `null` entries and fields of the wrong
/// type become `None` instead of failing the whole result list.
impl From<&Value> for Photo {
    fn from(entry: &Value) -> Self {
        let src = entry
            .get("src")
            .filter(|src| src.is_object())
            .map(|src| PhotoSources {
                large: src.get("large").and_then(Value::as_str).map(str::to_string),
            });
        Self {
            id: entry.get("id").and_then(Value::as_u64),
            src,
        }
    }
}

impl Photo {
    /// The large-size URL, if present and non-blank.
    pub fn large_url(&self) -> Option<&str> {
        self.src
            .as_ref()?
            .large
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
