//! Error types for the authoring pipeline, provider clients, store and config.
//!
//! Each boundary gets its own enum so callers can match on exactly the
//! failures that boundary can produce. The binary flattens them into
//! `Box<dyn Error>` at the top level.

use std::path::PathBuf;

/// Failures of [`crate::pipeline::DraftPipeline::generate_draft`].
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// The caller supplied an unusable request (e.g. a blank topic).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The text provider could not be reached or answered with a non-success status.
    #[error("text provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The text provider answered, but without any usable text.
    #[error("text provider returned no usable text")]
    ProviderEmptyOutput,

    /// The provider output could not be turned into an article.
    ///
    /// This is a soft failure: the authoring UI should offer a retry. The raw
    /// provider output is kept for diagnostics.
    #[error("could not generate an article from the provider output")]
    GenerationIncomplete {
        raw: String,
        parse_error: Option<String>,
    },
}

/// Failures talking to the stock-photo provider. Never escapes the image resolver.
#[derive(Debug, thiserror::Error)]
pub enum ImageSearchError {
    #[error("image search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image search returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Failures of the JSON article store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("store file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("an article with slug `{0}` already exists")]
    DuplicateSlug(String),

    #[error("no article with slug `{0}`")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}
