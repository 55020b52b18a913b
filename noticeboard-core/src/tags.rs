use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::types::{Category, Notice};

// ---------------------------------------------------------------------------
// Tag normalization
// ---------------------------------------------------------------------------

/// Normalize one tag: trim, NFC, lowercase. Blank tags yield `None`.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.nfc().collect::<String>().to_lowercase())
}

/// Normalize a tag list, keeping first-seen order and dropping duplicates.
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw.iter().filter_map(|t| normalize_tag(t.as_ref())) {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Derived tag index
// ---------------------------------------------------------------------------

/// Every tag used by at least one notice. Rebuilt from the collection, never
/// edited incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    tags: BTreeSet<String>,
}

impl TagIndex {
    pub fn build(notices: &[Notice]) -> Self {
        Self {
            tags: notices
                .iter()
                .flat_map(|n| n.tags.iter().cloned())
                .collect(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in sorted order.
    pub fn to_vec(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Category plus tag filter applied by the notice listing.
/// `category: None` means all categories; every listed tag must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeFilter {
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NoticeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(category: Category) -> Self {
        Self {
            category: Some(category),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = normalize_tags(tags);
        self
    }

    /// Flip a tag in the filter: add it when absent, remove it when present.
    pub fn toggle_tag(&mut self, tag: &str) {
        let Some(tag) = normalize_tag(tag) else {
            return;
        };
        if let Some(pos) = self.tags.iter().position(|t| *t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag);
        }
    }

    pub fn matches(&self, notice: &Notice) -> bool {
        if let Some(category) = self.category {
            if notice.category != category {
                return false;
            }
        }
        self.tags.iter().all(|tag| notice.tags.contains(tag))
    }
}

/// Categories that at least one notice uses, in canonical listing order.
pub fn categories_in_use(notices: &[Notice]) -> Vec<Category> {
    Category::ALL
        .iter()
        .copied()
        .filter(|c| notices.iter().any(|n| n.category == *c))
        .collect()
}
