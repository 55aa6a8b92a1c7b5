//! Re-illustrate every stored article.
//!
//! Each article's title is used as the image query. Lookups run a few at a
//! time and every article ends up with either a provider image or the
//! placeholder.

use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

use crate::error::StoreError;
use crate::images::{ImageResolver, ImageSource};
use crate::providers::ImageFinder;
use crate::store::ArticleStore;

/// Concurrent image lookups during a backfill.
const PARALLEL_LOOKUPS: usize = 4;

/// Outcome counts of a backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub provider_images: usize,
    pub placeholders: usize,
}

impl BackfillReport {
    /// Number of articles the run touched.
    pub fn total(&self) -> usize {
        self.provider_images + self.placeholders
    }
}

/// Resolve a fresh image for every article in `store` and write them back.
///
/// # Arguments
///
/// * `store` - The article store to update in place
/// * `resolver` - Image resolver; each article's title is the query
///
/// # Returns
///
/// How many articles received a provider image and how many the placeholder.
///
/// # Errors
///
/// Only store failures. Image lookup failures become placeholders.
#[instrument(level = "info", skip_all, fields(store = %store.path().display()))]
pub async fn fill_images<F: ImageFinder>(
    store: &ArticleStore,
    resolver: &ImageResolver<F>,
) -> Result<BackfillReport, StoreError> {
    let articles = store.list().await?;
    info!(count = articles.len(), "Backfilling article images");

    let resolved: Vec<_> = stream::iter(articles)
        .map(|mut article| async move {
            let image = resolver.resolve(&article.title).await;
            info!(slug = %article.slug, url = %image.url, "Updated article image");
            article.image_url = image.url;
            (article, image.source)
        })
        .buffered(PARALLEL_LOOKUPS)
        .collect()
        .await;

    let mut report = BackfillReport::default();
    let mut updated = Vec::with_capacity(resolved.len());
    for (article, source) in resolved {
        match source {
            ImageSource::Provider => report.provider_images += 1,
            ImageSource::Placeholder => report.placeholders += 1,
        }
        updated.push(article);
    }

    store.replace_all(&updated).await?;
    info!(
        provider_images = report.provider_images,
        placeholders = report.placeholders,
        "All articles updated"
    );
    Ok(report)
}
