//! # stemwire
//!
//! Assisted authoring for a STEM news site. An editor supplies a topic; the
//! tool asks a text-generation provider for a short article, repairs and
//! parses whatever comes back, derives a title, and picks an illustrative
//! stock photo. The draft is printed for review and can be published to a
//! local JSON article store.
//!
//! ## Features
//!
//! - Drafts articles through the Gemini `generateContent` API
//! - Tolerates fenced or non-JSON provider output
//! - Resolves images through Pexels with a placeholder fallback
//! - Keeps articles in a single JSON file with slug-based lookups
//! - Backfills images for every stored article
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... stemwire generate "the James Webb telescope" --publish
//! ```
//!
//! ## Architecture
//!
//! 1. **Prompt**: render instructions for the topic and category set
//! 2. **Draft + Image**: text call and image lookup run concurrently
//! 3. **Normalize**: strip fences, parse JSON, keep raw text on failure
//! 4. **Assemble**: title, category and image become a [`models::DraftArticle`]
//! 5. **Publish** (optional): the draft is stored as an [`models::Article`]

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod backfill;
mod categories;
mod cli;
mod commands;
mod config;
mod error;
mod images;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod prompt;
mod providers;
mod store;
mod title;
mod utils;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(command = ?args.command, config = ?args.config, "Parsed CLI arguments");

    let code = commands::run(args).await?;

    let elapsed = start_time.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "stemwire finished");
    Ok(code)
}
