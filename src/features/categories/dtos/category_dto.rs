use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for creating a category
///
/// `slug` is derived from `name` when not supplied; a supplied slug is run
/// through the same normalization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl NewCategory {
    pub fn named(name: impl Into<String>, parent: Option<i64>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            parent,
            country: None,
        }
    }
}

/// Partial category update; only present fields are written.
///
/// `parent` and `country` use a double option so "set to null" (`Some(None)`)
/// is distinguishable from "leave unchanged" (`None`).
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Option<String>>,
}
