//! The allowed-category set.
//!
//! An ordered, process-wide list of topical tags. The order matters: the
//! first entry is the fallback whenever the provider's choice is missing
//! (or, in strict mode, not a member of the set).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A topical tag articles are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub name: String,
    /// Badge color used by the site, e.g. `"#2563eb"`.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl Category {
    fn new(name: &str, color: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        }
    }
}

/// Non-empty ordered set of [`Category`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    /// Build a set, rejecting empty lists, blank names and duplicates.
    pub fn new(categories: Vec<Category>) -> Result<Self, ConfigError> {
        if categories.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one category must be configured".to_string(),
            ));
        }
        for (i, category) in categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("category #{} has a blank name", i + 1)));
            }
            if categories[..i].iter().any(|c| c.name == category.name) {
                return Err(ConfigError::Invalid(format!(
                    "category `{}` is listed twice",
                    category.name
                )));
            }
        }
        Ok(Self { categories })
    }

    /// The fallback category.
    pub fn first(&self) -> &Category {
        // `new` guarantees at least one entry.
        &self.categories[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// Map a provider-reported category onto the set.
    ///
    /// # Arguments
    ///
    /// * `raw` - The category string from the provider
    /// * `strict` - Replace values outside the set instead of keeping them
    ///
    /// # Returns
    ///
    /// The first category for a blank value. Otherwise `raw` unchanged, or
    /// the first category when `strict` is set and `raw` is not a member.
    pub fn coerce(&self, raw: &str, strict: bool) -> String {
        if raw.trim().is_empty() || (strict && !self.contains(raw)) {
            return self.first().name.clone();
        }
        raw.to_string()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

/// The site's eight standard categories, in fallback order.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Robotics Competitions",
            "#f97316",
            "Coverage of FIRST, VEX and other student robotics events.",
        ),
        Category::new(
            "STEM Breakthroughs Made Simple",
            "#2563eb",
            "Recent discoveries explained without the jargon.",
        ),
        Category::new(
            "Youth in Tech Spotlight",
            "#db2777",
            "Profiles of young builders, researchers and founders.",
        ),
        Category::new(
            "Educator Resources",
            "#16a34a",
            "Lesson ideas and classroom material for teachers.",
        ),
        Category::new(
            "Career Explorer",
            "#9333ea",
            "What STEM jobs look like and how people got there.",
        ),
        Category::new("Space", "#0f172a", "Astronomy, spaceflight and planetary science."),
        Category::new("Biology", "#65a30d", "Life sciences, medicine and ecology."),
        Category::new("Technology", "#0891b2", "Computing, AI, engineering and gadgets."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_order() {
        let set = CategorySet::default();
        assert_eq!(set.first().name, "Robotics Competitions");
        assert_eq!(set.names().count(), 8);
        assert!(set.contains("Space"));
        assert!(!set.contains("space"));
    }

    #[test]
    fn coerce_blank_to_first() {
        let set = CategorySet::default();
        assert_eq!(set.coerce("", false), "Robotics Competitions");
        assert_eq!(set.coerce("   ", true), "Robotics Competitions");
    }

    #[test]
    fn coerce_passes_unknown_through_when_lenient() {
        let set = CategorySet::default();
        assert_eq!(set.coerce("Astrology", false), "Astrology");
        assert_eq!(set.coerce(" Biology ", false), " Biology ");
        assert_eq!(set.coerce("Quantum  Physics", false), "Quantum  Physics");
    }

    #[test]
    fn coerce_replaces_unknown_when_strict() {
        let set = CategorySet::default();
        assert_eq!(set.coerce("Astrology", true), "Robotics Competitions");
        assert_eq!(set.coerce("Biology", true), "Biology");
        assert_eq!(set.coerce(" Biology ", true), "Robotics Competitions");
    }

    #[test]
    fn rejects_empty_and_duplicate_sets() {
        assert!(CategorySet::new(vec![]).is_err());

        let dup = vec![
            Category::new("Space", "", ""),
            Category::new("Space", "", ""),
        ];
        let err = CategorySet::new(dup).unwrap_err();
        assert!(err.to_string().contains("listed twice"));

        let blank = vec![Category::new(" ", "", "")];
        assert!(CategorySet::new(blank).is_err());
    }
}
