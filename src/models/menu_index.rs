use std::path::Path;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// category -> menu label -> brand / place names
///
/// Order follows the source file, which matters when a menu is looked up
/// without its category: the first category listing it wins.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct MenuIndex(IndexMap<String, IndexMap<String, Vec<String>>>);

/// Outcome of resolving a menu against the index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedMenu {
    pub category: String,
    pub brands: Vec<String>,
}

impl MenuIndex {
    pub fn new(categories: IndexMap<String, IndexMap<String, Vec<String>>>) -> Self {
        Self(categories)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read menu index at {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed menu index at {}", path.display()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn menu_count(&self) -> usize {
        self.0.values().map(IndexMap::len).sum()
    }

    /// First category (in file order) that lists `menu_id`.
    pub fn guess_category(&self, menu_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, menus)| menus.contains_key(menu_id))
            .map(|(category, _)| category.as_str())
    }

    /// An explicit category is trusted as-is; without one the category is
    /// inferred from the menu. Unknown menus resolve to no brands.
    pub fn resolve(&self, category: Option<&str>, menu_id: Option<&str>) -> ResolvedMenu {
        let Some(menu_id) = menu_id else {
            return ResolvedMenu {
                category: category.unwrap_or_default().to_string(),
                brands: Vec::new(),
            };
        };

        let category = match category {
            Some(category) => Some(category),
            None => self.guess_category(menu_id),
        };

        match category {
            Some(category) => ResolvedMenu {
                category: category.to_string(),
                brands: self
                    .0
                    .get(category)
                    .and_then(|menus| menus.get(menu_id))
                    .cloned()
                    .unwrap_or_default(),
            },
            None => ResolvedMenu::default(),
        }
    }
}
