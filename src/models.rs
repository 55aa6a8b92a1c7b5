//! Data models for draft and published articles.
//!
//! - [`GenerationRequest`]: a validated topic for one authoring call
//! - [`DraftArticle`]: the pipeline's publish-ready (but unreviewed) result
//! - [`Article`]: a stored article record
//!
//! Field names serialize to the JSON shape the site's front end reads
//! (`content`, `image_url`).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::utils::slugify_title;

/// A single authoring request. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topic: String,
}

impl GenerationRequest {
    /// Validate `topic`, rejecting blank input.
    pub fn new(topic: &str) -> Result<Self, DraftError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DraftError::InvalidRequest("topic must not be empty".to_string()));
        }
        Ok(Self {
            topic: topic.to_string(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// A machine-assisted article candidate.
///
/// Always needs human review before it is published.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DraftArticle {
    /// Derived from the body; never supplied by the caller.
    pub title: String,
    /// Body using the `<b>`, `<i>`, `<u>` and `<br>` markup vocabulary.
    #[serde(rename = "content")]
    pub body: String,
    pub category: String,
    /// Provider image URL or the local placeholder path.
    pub image_url: String,
}

/// A stored article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    /// Unique key in the store.
    pub slug: String,
    pub content: String,
    pub author: String,
    /// Publication date, `YYYY-MM-DD`.
    pub date: String,
    pub category: String,
    pub image_url: String,
    /// Slugs of related articles.
    #[serde(default)]
    pub related: Vec<String>,
}

impl Article {
    /// Turn a reviewed draft into a storable article.
    ///
    /// # Arguments
    ///
    /// * `draft` - The reviewed draft
    /// * `author` - Byline to store
    /// * `date` - Publication date, `YYYY-MM-DD`
    ///
    /// # Returns
    ///
    /// An [`Article`] whose slug is derived from the title. Titles without
    /// any ASCII letters or digits get `article-{date}-{hash}` instead, so
    /// the slug is never empty.
    pub fn from_draft(draft: DraftArticle, author: &str, date: &str) -> Self {
        Self {
            slug: slug_for(&draft.title, date),
            title: draft.title,
            content: draft.body,
            author: author.to_string(),
            date: date.to_string(),
            category: draft.category,
            image_url: draft.image_url,
            related: Vec::new(),
        }
    }
}

fn slug_for(title: &str, date: &str) -> String {
    let slug = slugify_title(title);
    if !slug.is_empty() {
        return slug;
    }
    let mut hasher = DefaultHasher::new();
    title.hash(&mut hasher);
    format!("article-{date}-{:08x}", hasher.finish() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> DraftArticle {
        DraftArticle {
            title: "Mars Rover Perseverance Lands!".to_string(),
            body: "<b>Mars Rover Perseverance Lands!</b><br>More.".to_string(),
            category: "Space".to_string(),
            image_url: "/placeholder-1.jpg".to_string(),
        }
    }

    #[test]
    fn request_rejects_blank_topic() {
        assert!(matches!(
            GenerationRequest::new("  "),
            Err(DraftError::InvalidRequest(_))
        ));
        assert_eq!(GenerationRequest::new(" CRISPR ").unwrap().topic(), "CRISPR");
    }

    #[test]
    fn draft_serializes_site_field_names() {
        let json = serde_json::to_value(draft()).unwrap();
        assert_eq!(json["content"], "<b>Mars Rover Perseverance Lands!</b><br>More.");
        assert_eq!(json["image_url"], "/placeholder-1.jpg");
        assert!(json.get("body").is_none());
    }

    #[test]
    fn article_from_draft() {
        let article = Article::from_draft(draft(), "Team MakEMinds", "2025-06-01");
        assert_eq!(article.slug, "mars-rover-perseverance-lands");
        assert_eq!(article.title, "Mars Rover Perseverance Lands!");
        assert_eq!(article.author, "Team MakEMinds");
        assert_eq!(article.date, "2025-06-01");
        assert_eq!(article.category, "Space");
        assert!(article.related.is_empty());
    }

    #[test]
    fn non_ascii_title_gets_a_dated_slug() {
        let mut d = draft();
        d.title = "火星探査".to_string();
        let article = Article::from_draft(d.clone(), "Team MakEMinds", "2025-06-01");
        assert!(article.slug.starts_with("article-2025-06-01-"), "{}", article.slug);
        assert_eq!(article.slug.len(), "article-2025-06-01-".len() + 8);

        let again = Article::from_draft(d.clone(), "Team MakEMinds", "2025-06-01");
        assert_eq!(article.slug, again.slug);

        d.title = "量子コンピュータ".to_string();
        let other = Article::from_draft(d, "Team MakEMinds", "2025-06-01");
        assert_ne!(article.slug, other.slug);
    }

    #[test]
    fn article_related_defaults_to_empty() {
        let json = r#"{
            "title": "CRISPR: The Gene Editing Revolution",
            "slug": "crispr-gene-editing",
            "content": "CRISPR technology is making gene editing faster...",
            "author": "Team MakEMinds",
            "date": "2024-05-20",
            "category": "Biology",
            "image_url": "https://images.pexels.com/photos/9749977/pexels-photo-9749977.jpeg"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.slug, "crispr-gene-editing");
        assert!(article.related.is_empty());
    }
}
