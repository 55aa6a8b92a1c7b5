//! Application configuration.
//!
//! Settings come from an optional YAML file; credentials and the store path
//! can be overridden from the command line or environment (see
//! [`crate::cli::Cli`]). Anything unset falls back to the defaults below.
//!
//! ```yaml
//! gemini:
//!   model: gemini-2.0-flash
//! pexels:
//!   base_url: https://api.pexels.com
//! placeholder_image: /placeholder-1.jpg
//! strict_categories: false
//! store_path: data/articles.json
//! categories:
//!   - name: Space
//!     color: "#0f172a"
//!     description: Astronomy and spaceflight.
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::categories::{Category, CategorySet, default_categories};
use crate::error::ConfigError;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "stemwire.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub pexels: PexelsConfig,
    /// Image path used whenever no provider image is available.
    pub placeholder_image: String,
    /// Coerce provider categories outside the allowed set to the first one.
    pub strict_categories: bool,
    pub store_path: PathBuf,
    pub default_author: String,
    pub request_timeout_secs: u64,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PexelsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            pexels: PexelsConfig::default(),
            placeholder_image: "/placeholder-1.jpg".to_string(),
            strict_categories: false,
            store_path: PathBuf::from("data/articles.json"),
            default_author: "Team MakEMinds".to_string(),
            request_timeout_secs: 60,
            categories: default_categories(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.pexels.com".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is read if present, otherwise defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("No config file; using defaults");
                    return Self::default().validated();
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to `null`, not to the defaults.
        if text.trim().is_empty() {
            return Self::default().validated();
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validated()
    }

    /// Apply command-line/environment overrides. Blank values are ignored.
    pub fn with_overrides(
        mut self,
        gemini_api_key: Option<String>,
        pexels_api_key: Option<String>,
        store_path: Option<PathBuf>,
    ) -> Self {
        if let Some(key) = gemini_api_key.filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
        if let Some(key) = pexels_api_key.filter(|k| !k.trim().is_empty()) {
            self.pexels.api_key = Some(key);
        }
        if let Some(path) = store_path {
            self.store_path = path;
        }
        self
    }

    /// The validated allowed-category set.
    pub fn category_set(&self) -> Result<CategorySet, ConfigError> {
        CategorySet::new(self.categories.clone())
    }

    /// The Gemini key; required for generation.
    pub fn gemini_api_key(&self) -> Result<&str, ConfigError> {
        non_blank(&self.gemini.api_key).ok_or(ConfigError::MissingCredential("GEMINI_API_KEY"))
    }

    /// The Pexels key, if configured.
    pub fn pexels_api_key(&self) -> Option<&str> {
        non_blank(&self.pexels.api_key)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.category_set()?;
        for (name, base_url) in [
            ("gemini.base_url", &self.gemini.base_url),
            ("pexels.base_url", &self.pexels.base_url),
        ] {
            Url::parse(base_url)
                .map_err(|e| ConfigError::Invalid(format!("{name} `{base_url}`: {e}")))?;
        }
        if self.placeholder_image.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "placeholder_image must not be empty".to_string(),
            ));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::Invalid("gemini.model must not be empty".to_string()));
        }
        Ok(self)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
