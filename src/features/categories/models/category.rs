use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A taxonomy tag, optionally nested under a parent tag
///
/// `id` is assigned by the Data Store; a record without one has not been
/// persisted yet and never participates in a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A category with its children attached, derived from the flat list
///
/// Ephemeral view structure: fully discarded and rebuilt whenever the flat
/// collection changes, never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent: Option<i64>,
    pub country: Option<String>,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub(crate) fn from_category(id: i64, category: &Category) -> Self {
        Self {
            id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            parent: category.parent,
            country: category.country.clone(),
            children: Vec::new(),
        }
    }
}
