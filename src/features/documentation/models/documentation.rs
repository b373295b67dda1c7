use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A documentation attachment (datasheet, certificate) for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Documentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub name: String,
    #[serde(default)]
    pub file_url: Option<String>,
    pub product: i64,
}
