//! Best-effort illustrative image lookup.
//!
//! Resolution never fails: a missing credential, an empty result set, or
//! any transport or parse error yields the placeholder path.

use tracing::{debug, info, instrument, warn};

use crate::providers::ImageFinder;

/// Number of photos requested per search.
pub const PAGE_SIZE: u8 = 5;

/// Where an image URL came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Provider,
    Placeholder,
}

/// A resolved image URL or placeholder path; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub source: ImageSource,
}

#[derive(Debug)]
pub struct ImageResolver<F> {
    /// `None` when no image-provider credential is configured.
    finder: Option<F>,
    placeholder: String,
}

impl<F: ImageFinder> ImageResolver<F> {
    /// Create a resolver.
    ///
    /// # Arguments
    ///
    /// * `finder` - The stock-photo client, or `None` to always use the placeholder
    /// * `placeholder` - Path returned whenever no provider image is found
    pub fn new(finder: Option<F>, placeholder: impl Into<String>) -> Self {
        Self {
            finder,
            placeholder: placeholder.into(),
        }
    }

    /// Resolve an image for `query`.
    ///
    /// Makes at most one outbound request, and none when no provider is
    /// configured.
    ///
    /// # Returns
    ///
    /// The first photo's large URL, scanning results in provider order, or
    /// the placeholder. Never fails.
    #[instrument(level = "info", skip_all, fields(%query))]
    pub async fn resolve(&self, query: &str) -> ResolvedImage {
        let Some(finder) = &self.finder else {
            debug!("No image provider configured; using placeholder");
            return self.fallback();
        };

        match finder.search(query, PAGE_SIZE).await {
            Ok(photos) => match photos
                .iter()
                .find_map(|photo| photo.large_url().map(|url| (photo.id, url)))
            {
                Some((photo_id, url)) => {
                    info!(?photo_id, %url, "Resolved provider image");
                    ResolvedImage {
                        url: url.to_string(),
                        source: ImageSource::Provider,
                    }
                }
                None => {
                    warn!(results = photos.len(), "No photo with a large URL; using placeholder");
                    self.fallback()
                }
            },
            Err(e) => {
                warn!(error = %e, "Image search failed; using placeholder");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> ResolvedImage {
        ResolvedImage {
            url: self.placeholder.clone(),
            source: ImageSource::Placeholder,
        }
    }
}
