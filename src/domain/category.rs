//! Static expense category catalog.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Category identifiers are short slugs such as `food` or `housing`.
pub type CategoryId = String;

/// Identifier every unknown or missing category resolves to.
pub const FALLBACK_CATEGORY_ID: &str = "other";

/// Color used for totals whose category is not part of the catalog.
pub const NEUTRAL_COLOR: &str = "#6B7280";

/// Catalog entry with display metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Category {
    fn builtin(id: &str, name: &str, icon: &str, color: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            is_default: true,
        }
    }

    /// Synthetic entry returned for ids the registry does not know.
    pub fn fallback() -> Self {
        Self {
            id: FALLBACK_CATEGORY_ID.into(),
            name: "Other".into(),
            icon: "more-horizontal".into(),
            color: "#8E8E93".into(),
            is_default: false,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

static BUILTIN: Lazy<CategoryRegistry> = Lazy::new(|| {
    CategoryRegistry::from_entries(vec![
        Category::builtin("food", "Food & Dining", "utensils", "#FF9500"),
        Category::builtin("transportation", "Transportation", "car", "#5E5CE6"),
        Category::builtin("housing", "Housing & Rent", "home", "#0A84FF"),
        Category::builtin("utilities", "Utilities", "bolt", "#FF3B30"),
        Category::builtin("entertainment", "Entertainment", "film", "#FF2D55"),
        Category::builtin("healthcare", "Healthcare", "heart", "#34C759"),
        Category::builtin("shopping", "Shopping", "shopping-bag", "#AF52DE"),
        Category::builtin("education", "Education", "book", "#32ADE6"),
        Category::builtin("personal", "Personal Care", "user", "#FF9500"),
        Category::builtin("other", "Other", "more-horizontal", "#8E8E93"),
    ])
});

/// Read-only catalog of expense categories.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    entries: Vec<Category>,
    fallback: Category,
}

impl CategoryRegistry {
    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static CategoryRegistry {
        &BUILTIN
    }

    pub fn from_entries(entries: Vec<Category>) -> Self {
        Self {
            entries,
            fallback: Category::fallback(),
        }
    }

    pub fn all(&self) -> &[Category] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.entries.iter().find(|category| category.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the matching entry, or the synthetic "other" entry when `id`
    /// is unknown or absent.
    pub fn lookup(&self, id: Option<&str>) -> &Category {
        id.and_then(|id| self.get(id)).unwrap_or(&self.fallback)
    }

    /// Canonical grouping key: known ids map to themselves, everything else
    /// to [`FALLBACK_CATEGORY_ID`].
    pub fn resolve_id(&self, id: Option<&str>) -> &str {
        &self.lookup(id).id
    }

    pub fn icon_for(&self, id: &str) -> &str {
        &self.lookup(Some(id)).icon
    }

    /// Color for a category total. Ids outside the catalog get the neutral
    /// gray rather than the fallback entry's color.
    pub fn color_for(&self, id: &str) -> &str {
        self.get(id)
            .map(|category| category.color.as_str())
            .unwrap_or(NEUTRAL_COLOR)
    }
}
