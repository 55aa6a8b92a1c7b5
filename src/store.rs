//! JSON-file article store.
//!
//! A keyed record store over a single JSON array on disk. Each operation
//! reads the file, applies the change, and writes the whole array back.
//! A missing file is an empty store.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, instrument};

use crate::error::StoreError;
use crate::models::Article;

#[derive(Debug, Clone)]
pub struct ArticleStore {
    path: PathBuf,
}

impl ArticleStore {
    /// Open a store backed by the JSON file at `path`.
    ///
    /// Nothing is read or created until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored article, in insertion order.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file exists but cannot be read, and
    /// [`StoreError::Serialization`] if it is not a JSON article array.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub async fn list(&self) -> Result<Vec<Article>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Look up one article by its slug.
    ///
    /// # Arguments
    ///
    /// * `slug` - Exact slug to match
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no article carries that slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError> {
        Ok(self.list().await?.into_iter().find(|a| a.slug == slug))
    }

    /// Articles filed under `category`, in insertion order.
    ///
    /// # Arguments
    ///
    /// * `category` - Category name, matched exactly
    ///
    /// # Returns
    ///
    /// The matching articles; empty when none match.
    pub async fn find_by_category(&self, category: &str) -> Result<Vec<Article>, StoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|a| a.category == category)
            .collect())
    }

    /// Insert a new article. Slugs are unique.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if title, slug, content or category is blank
    /// - [`StoreError::DuplicateSlug`] if the slug is already taken
    #[instrument(level = "info", skip_all, fields(slug = %article.slug))]
    pub async fn create(&self, article: Article) -> Result<Article, StoreError> {
        validate(&article)?;
        let mut articles = self.list().await?;
        if articles.iter().any(|a| a.slug == article.slug) {
            return Err(StoreError::DuplicateSlug(article.slug));
        }
        articles.push(article.clone());
        self.save(&articles).await?;
        info!("Article created");
        Ok(article)
    }

    /// Replace the article stored under `slug`. The replacement may carry a new slug.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if nothing is stored under `slug`
    /// - [`StoreError::DuplicateSlug`] if the new slug belongs to another article
    /// - [`StoreError::Validation`] for blank required fields
    #[instrument(level = "info", skip_all, fields(%slug))]
    pub async fn update(&self, slug: &str, article: Article) -> Result<Article, StoreError> {
        validate(&article)?;
        let mut articles = self.list().await?;
        let index = articles
            .iter()
            .position(|a| a.slug == slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))?;
        if article.slug != slug && articles.iter().any(|a| a.slug == article.slug) {
            return Err(StoreError::DuplicateSlug(article.slug));
        }
        articles[index] = article.clone();
        self.save(&articles).await?;
        info!("Article updated");
        Ok(article)
    }

    /// Remove and return the article stored under `slug`.
    #[instrument(level = "info", skip_all, fields(%slug))]
    pub async fn delete(&self, slug: &str) -> Result<Article, StoreError> {
        let mut articles = self.list().await?;
        let index = articles
            .iter()
            .position(|a| a.slug == slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))?;
        let removed = articles.remove(index);
        self.save(&articles).await?;
        info!("Article deleted");
        Ok(removed)
    }

    /// Overwrite the whole store.
    pub async fn replace_all(&self, articles: &[Article]) -> Result<(), StoreError> {
        for article in articles {
            validate(article)?;
        }
        self.save(articles).await
    }

    async fn save(&self, articles: &[Article]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(articles)?;
        // Replace the file atomically.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        debug!(count = articles.len(), "Store written");
        Ok(())
    }
}

fn validate(article: &Article) -> Result<(), StoreError> {
    let required = [
        ("title", &article.title),
        ("slug", &article.slug),
        ("content", &article.content),
        ("category", &article.category),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(StoreError::Validation(format!("`{field}` must not be empty")));
        }
    }
    Ok(())
}
