//! Command-line interface definitions for stemwire.
//!
//! Credentials can be provided via flags or environment variables; all other
//! settings live in the YAML config file (see [`crate::config`]).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for stemwire.
///
/// # Examples
///
/// ```sh
/// # Draft an article and print it as JSON
/// GEMINI_API_KEY=... stemwire generate "the James Webb telescope"
///
/// # Draft, illustrate and publish to the local store
/// stemwire generate "CRISPR" --publish --pexels-api-key YOUR_KEY
///
/// # Browse stored articles
/// stemwire articles --category Space
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML config file (defaults to ./stemwire.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Pexels API key; without it drafts use the placeholder image
    #[arg(long, env = "PEXELS_API_KEY", global = true, hide_env_values = true)]
    pub pexels_api_key: Option<String>,

    /// Article store file (overrides `store_path` from the config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Draft an article about a topic
    Generate {
        /// Free-text topic to write about
        topic: String,

        /// Save the draft to the article store
        #[arg(long)]
        publish: bool,

        /// Also write the draft JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List stored articles
    Articles {
        /// Only show articles in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Print one stored article as JSON
    Show { slug: String },

    /// Replace a stored article with the JSON in a file
    Edit {
        slug: String,

        /// Article JSON to store under this slug
        #[arg(long)]
        from: PathBuf,
    },

    /// Remove a stored article
    Delete { slug: String },

    /// Print the allowed categories
    Categories,

    /// Look up a fresh image for every stored article
    FillImages,
}
