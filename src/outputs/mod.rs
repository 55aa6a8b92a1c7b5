//! Output writers for generated drafts.
//!
//! - [`json`]: writes a `DraftArticle` to a JSON file for review in other tools

pub mod json;
