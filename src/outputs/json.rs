//! JSON output for drafts.
//!
//! The file uses the same shape the site's authoring UI consumes:
//! `title`, `content`, `category`, `image_url`.

use std::error::Error;
use std::path::Path;

use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::DraftArticle;

/// Write `draft` as pretty-printed JSON to `path`, creating parent directories.
///
/// # Arguments
///
/// * `draft` - The draft to serialize
/// * `path` - Destination file; overwritten if it exists
///
/// # Returns
///
/// `Ok(())` on success, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_draft(draft: &DraftArticle, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(draft)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!("Wrote draft JSON");
    Ok(())
}
