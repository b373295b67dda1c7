use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A catalog product as persisted in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub heading: String,
    pub subheading: String,
    pub short_description: String,
    pub reference: String,
    #[serde(default)]
    pub technical_file_url: Option<String>,
    pub size: String,
    /// Historically persisted either as a JSON array or as a JSON-encoded
    /// string; normalized to a real array on read and always written as one.
    #[serde(default, deserialize_with = "deserialize_sectors")]
    pub sectors: Vec<String>,
    pub long_description: String,
    #[serde(default)]
    pub standards: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

/// A product photo record, linked to its product by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub image_url: String,
    pub product: i64,
}

/// A standards/certification image record, linked to its product by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub image_url: String,
    pub product: i64,
}

fn deserialize_sectors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SectorsRepr {
        List(Vec<String>),
        Encoded(String),
        Null(()),
    }

    match SectorsRepr::deserialize(deserializer)? {
        SectorsRepr::List(sectors) => Ok(sectors),
        SectorsRepr::Encoded(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|_| {
            // A bare string that is not encoded JSON degrades to one sector.
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                vec![raw]
            }
        })),
        SectorsRepr::Null(()) => Ok(Vec::new()),
    }
}
