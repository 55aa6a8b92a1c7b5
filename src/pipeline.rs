//! The assisted-authoring pipeline.
//!
//! `generate_draft(topic)` runs:
//! 1. **Prompt**: render the article instructions for the topic
//! 2. **Draft**: one call to the text provider
//! 3. **Normalize**: strip fences, parse JSON, fall back to raw text
//! 4. **Title**: derive a display title from the body
//! 5. **Image**: resolve an illustrative image for the topic
//!
//! The text call and the image lookup only depend on the topic, so they
//! run concurrently. Image failures never leave the resolver.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::categories::CategorySet;
use crate::error::DraftError;
use crate::images::ImageResolver;
use crate::models::{DraftArticle, GenerationRequest};
use crate::normalize::normalize_response;
use crate::prompt::build_prompt;
use crate::providers::{ImageFinder, TextDrafter};
use crate::title::extract_title;
use crate::utils::truncate_for_log;

#[derive(Debug)]
pub struct DraftPipeline<D, F> {
    drafter: D,
    images: ImageResolver<F>,
    categories: Arc<CategorySet>,
    /// Replace provider categories outside the allowed set with the first entry.
    strict_categories: bool,
}

impl<D, F> DraftPipeline<D, F>
where
    D: TextDrafter,
    F: ImageFinder,
{
    pub fn new(drafter: D, images: ImageResolver<F>, categories: Arc<CategorySet>) -> Self {
        Self {
            drafter,
            images,
            categories,
            strict_categories: false,
        }
    }

    pub fn with_strict_categories(mut self, strict: bool) -> Self {
        self.strict_categories = strict;
        self
    }

    /// Generate a draft article for `topic`.
    ///
    /// # Errors
    ///
    /// - [`DraftError::InvalidRequest`] for a blank topic
    /// - [`DraftError::ProviderUnavailable`] / [`DraftError::ProviderEmptyOutput`]
    ///   from the text provider
    /// - [`DraftError::GenerationIncomplete`] when the output yields no body;
    ///   carries the raw provider text
    #[instrument(level = "info", skip_all, fields(topic = %topic))]
    pub async fn generate_draft(&self, topic: &str) -> Result<DraftArticle, DraftError> {
        let t0 = Instant::now();
        let request = GenerationRequest::new(topic)?;
        let prompt = build_prompt(request.topic(), &self.categories);
        debug!(prompt_bytes = prompt.len(), "Rendered prompt");

        let (raw, image) = tokio::join!(
            self.drafter.draft(&prompt),
            self.images.resolve(request.topic())
        );
        let raw = raw?;

        let normalized = normalize_response(&raw);
        if let Some(parse_error) = normalized.parse_error() {
            warn!(
                error = %parse_error,
                response_preview = %truncate_for_log(&raw, 300),
                "Provider output was not JSON; using raw text as the body"
            );
        }
        let parse_error = normalized.parse_error().map(str::to_string);
        let fields = normalized.into_fields(&self.categories);

        if fields.content.trim().is_empty() {
            warn!(
                category = %fields.category,
                response_preview = %truncate_for_log(&raw, 300),
                "Provider output has no article body"
            );
            return Err(DraftError::GenerationIncomplete { raw, parse_error });
        }

        let category = self
            .categories
            .coerce(&fields.category, self.strict_categories);
        if !self.categories.contains(&category) {
            warn!(%category, "Provider chose a category outside the allowed set");
        }

        let title = extract_title(&fields.content);
        let dt = t0.elapsed();
        info!(
            %title,
            %category,
            image_source = ?image.source,
            elapsed_ms = dt.as_millis() as u64,
            "Draft generated"
        );

        Ok(DraftArticle {
            title,
            body: fields.content,
            category,
            image_url: image.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::tests::{FakeFinder, PLACEHOLDER, photo};
    use std::sync::Mutex;

    /// Replays a fixed outcome and records every prompt it receives.
    struct FakeDrafter {
        outcome: Result<String, fn() -> DraftError>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeDrafter {
        fn replying(text: &str) -> Self {
            Self {
                outcome: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: fn() -> DraftError) -> Self {
            Self {
                outcome: Err(err),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextDrafter for FakeDrafter {
        async fn draft(&self, prompt: &str) -> Result<String, DraftError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.outcome {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn pipeline<'a>(
        drafter: FakeDrafter,
        finder: Option<&'a FakeFinder>,
    ) -> DraftPipeline<FakeDrafter, &'a FakeFinder> {
        DraftPipeline::new(
            drafter,
            ImageResolver::new(finder, PLACEHOLDER),
            Arc::new(CategorySet::default()),
        )
    }

    #[tokio::test]
    async fn fenced_json_becomes_a_draft() {
        let finder = FakeFinder::with_photos(vec![photo(Some("https://img/rover.jpg"))]);
        let drafter = FakeDrafter::replying(
            "```json\n{\"category\":\"Space\",\"content\":\"<b>Hi.</b><br>More.\"}\n```",
        );
        let p = pipeline(drafter, Some(&finder));

        let draft = p.generate_draft("mars rover").await.unwrap();
        assert_eq!(
            draft,
            DraftArticle {
                title: "Hi".to_string(),
                body: "<b>Hi.</b><br>More.".to_string(),
                category: "Space".to_string(),
                image_url: "https://img/rover.jpg".to_string(),
            }
        );

        let prompts = p.drafter.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"mars rover\""));
        assert_eq!(finder.queries.lock().unwrap()[0].0, "mars rover");
    }

    #[tokio::test]
    async fn non_json_output_is_kept_as_body() {
        let p = pipeline(FakeDrafter::replying("Not JSON at all."), None);

        let draft = p.generate_draft("anything").await.unwrap();
        assert_eq!(draft.body, "Not JSON at all.");
        assert_eq!(draft.title, "Not JSON at all");
        assert_eq!(draft.category, "Robotics Competitions");
        assert_eq!(draft.image_url, PLACEHOLDER);
    }

    #[tokio::test]
    async fn missing_category_defaults_to_first() {
        let p = pipeline(FakeDrafter::replying(r#"{"content":"Plain body. More."}"#), None);
        let draft = p.generate_draft("t").await.unwrap();
        assert_eq!(draft.category, "Robotics Competitions");
        assert_eq!(draft.title, "Plain body");
    }

    #[tokio::test]
    async fn unknown_category_passes_through_unless_strict() {
        let reply = r#"{"category":"Astrology","content":"<b>Stars</b>"}"#;

        let lenient = pipeline(FakeDrafter::replying(reply), None);
        assert_eq!(lenient.generate_draft("t").await.unwrap().category, "Astrology");

        let strict = pipeline(FakeDrafter::replying(reply), None).with_strict_categories(true);
        assert_eq!(
            strict.generate_draft("t").await.unwrap().category,
            "Robotics Competitions"
        );
    }

    #[tokio::test]
    async fn empty_fields_are_incomplete_with_raw_output() {
        let raw = r#"{"category":"","content":""}"#;
        let p = pipeline(FakeDrafter::replying(raw), None);

        match p.generate_draft("t").await.unwrap_err() {
            DraftError::GenerationIncomplete { raw: got, parse_error } => {
                assert_eq!(got, raw);
                assert_eq!(parse_error, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn category_without_body_is_incomplete() {
        let p = pipeline(FakeDrafter::replying(r#"{"category":"Space"}"#), None);
        let err = p.generate_draft("t").await.unwrap_err();
        assert!(matches!(err, DraftError::GenerationIncomplete { .. }));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let p = pipeline(FakeDrafter::failing(|| DraftError::ProviderEmptyOutput), None);
        assert!(matches!(
            p.generate_draft("t").await,
            Err(DraftError::ProviderEmptyOutput)
        ));

        let p = pipeline(
            FakeDrafter::failing(|| DraftError::ProviderUnavailable("status 500".to_string())),
            None,
        );
        assert!(matches!(
            p.generate_draft("t").await,
            Err(DraftError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn image_failure_never_fails_the_draft() {
        let finder = FakeFinder::failing();
        let reply = r#"{"category":"Biology","content":"Cells."}"#;
        let p = pipeline(FakeDrafter::replying(reply), Some(&finder));

        let draft = p.generate_draft("cells").await.unwrap();
        assert_eq!(draft.image_url, PLACEHOLDER);
        assert_eq!(finder.calls(), 1);
    }

    #[tokio::test]
    async fn blank_topic_is_rejected_before_any_call() {
        let finder = FakeFinder::default();
        let p = pipeline(FakeDrafter::replying("unused"), Some(&finder));

        assert!(matches!(
            p.generate_draft("   ").await,
            Err(DraftError::InvalidRequest(_))
        ));
        assert!(p.drafter.prompts.lock().unwrap().is_empty());
        assert_eq!(finder.calls(), 0);
    }

    #[tokio::test]
    async fn successful_drafts_always_have_body_and_image() {
        let replies = [
            "Not JSON at all.",
            r#"{"content":"x"}"#,
            "```\n{\"category\":\"Space\",\"content\":\"<i>y</i>\"}\n```",
            "```python\nprint('hi')\n```",
        ];
        for reply in replies {
            let p = pipeline(FakeDrafter::replying(reply), None);
            let draft = p.generate_draft("t").await.unwrap();
            assert!(!draft.body.is_empty(), "{reply}");
            assert!(!draft.title.is_empty(), "{reply}");
            assert!(!draft.category.is_empty(), "{reply}");
            assert!(!draft.image_url.is_empty(), "{reply}");
        }
    }
}
