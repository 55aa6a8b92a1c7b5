//! Subcommand handlers.
//!
//! Everything here is plumbing: build the clients the config asks for, run
//! one operation, print the result. Drafts and articles go to stdout as
//! JSON or plain lines; diagnostics go through `tracing` to stderr.

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};

use crate::backfill::fill_images;
use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::error::{ConfigError, DraftError, StoreError};
use crate::images::ImageResolver;
use crate::models::Article;
use crate::outputs::json;
use crate::pipeline::DraftPipeline;
use crate::providers::gemini::GeminiClient;
use crate::providers::pexels::PexelsClient;
use crate::store::ArticleStore;
use crate::utils::{today, truncate_for_log};

/// Exit status for "could not generate, try again".
const EXIT_GENERATION_INCOMPLETE: u8 = 2;

pub async fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(
        cli.gemini_api_key,
        cli.pexels_api_key,
        cli.store,
    );
    debug!(
        store = %config.store_path.display(),
        strict = config.strict_categories,
        "Effective configuration"
    );
    let store = ArticleStore::new(&config.store_path);

    match cli.command {
        Command::Generate {
            topic,
            publish,
            output,
        } => generate(&config, &store, &topic, publish, output.as_deref()).await,
        Command::Articles { category } => {
            list_articles(&store, category.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { slug } => {
            let article = store
                .find_by_slug(&slug)
                .await?
                .ok_or(StoreError::NotFound(slug))?;
            println!("{}", serde_json::to_string_pretty(&article)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Edit { slug, from } => {
            let text = tokio::fs::read_to_string(&from)
                .await
                .map_err(|e| StoreError::io(&from, e))?;
            let article: Article = serde_json::from_str(&text)?;
            let updated = store.update(&slug, article).await?;
            println!("Updated {} ({})", updated.slug, updated.title);
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { slug } => {
            let removed = store.delete(&slug).await?;
            println!("Deleted {} ({})", removed.slug, removed.title);
            Ok(ExitCode::SUCCESS)
        }
        Command::Categories => {
            for category in config.category_set()?.iter() {
                println!("{}\t{}\t{}", category.name, category.color, category.description);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::FillImages => {
            backfill(&config, &store).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn http_client(config: &AppConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
}

/// An image resolver backed by Pexels when a key is configured.
fn image_resolver(config: &AppConfig, http: Client) -> ImageResolver<PexelsClient> {
    let finder = config
        .pexels_api_key()
        .map(|key| PexelsClient::new(http, key, &config.pexels.base_url));
    if finder.is_none() {
        info!("PEXELS_API_KEY not set; drafts will use the placeholder image");
    }
    ImageResolver::new(finder, &config.placeholder_image)
}

#[instrument(level = "info", skip_all, fields(%topic, publish = publish))]
async fn generate(
    config: &AppConfig,
    store: &ArticleStore,
    topic: &str,
    publish: bool,
    output: Option<&Path>,
) -> Result<ExitCode, Box<dyn Error>> {
    let categories = Arc::new(config.category_set()?);
    let http = http_client(config)?;
    let drafter = GeminiClient::new(
        http.clone(),
        config.gemini_api_key()?,
        &config.gemini.model,
        &config.gemini.base_url,
    );
    let pipeline = DraftPipeline::new(drafter, image_resolver(config, http), categories)
        .with_strict_categories(config.strict_categories);

    let draft = match pipeline.generate_draft(topic).await {
        Ok(draft) => draft,
        Err(DraftError::GenerationIncomplete { raw, parse_error }) => {
            warn!(
                parse_error = parse_error.as_deref().unwrap_or("none"),
                raw_preview = %truncate_for_log(&raw, 500),
                "Generation incomplete"
            );
            debug!(%raw, "Full provider output");
            eprintln!("Could not generate an article for this topic. Please try again.");
            return Ok(ExitCode::from(EXIT_GENERATION_INCOMPLETE));
        }
        Err(e) => {
            error!(error = %e, "Draft generation failed");
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&draft)?);

    if let Some(path) = output {
        json::write_draft(&draft, path).await?;
    }

    if publish {
        let article = Article::from_draft(draft, &config.default_author, &today());
        let article = store.create(article).await?;
        info!(slug = %article.slug, "Draft published");
        eprintln!("Published as `{}`. Review it before it goes live.", article.slug);
    } else {
        eprintln!("Draft ready. Review it before publishing.");
    }

    Ok(ExitCode::SUCCESS)
}

async fn list_articles(store: &ArticleStore, category: Option<&str>) -> Result<(), StoreError> {
    let articles = match category {
        Some(category) => store.find_by_category(category).await?,
        None => store.list().await?,
    };
    if articles.is_empty() {
        eprintln!("No articles found.");
    }
    for article in articles {
        println!(
            "{}\t{}\t{}\t{}",
            article.date, article.category, article.slug, article.title
        );
    }
    Ok(())
}

async fn backfill(config: &AppConfig, store: &ArticleStore) -> Result<(), Box<dyn Error>> {
    let key = config
        .pexels_api_key()
        .ok_or(ConfigError::MissingCredential("PEXELS_API_KEY"))?;
    let finder = PexelsClient::new(http_client(config)?, key, &config.pexels.base_url);
    let resolver = ImageResolver::new(Some(finder), &config.placeholder_image);

    let report = fill_images(store, &resolver).await?;
    println!(
        "Updated {} articles ({} provider images, {} placeholders)",
        report.total(),
        report.provider_images,
        report.placeholders
    );
    Ok(())
}
