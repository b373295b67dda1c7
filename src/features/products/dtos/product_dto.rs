use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::products::models::{Product, ProductImage, StandardImage};

/// Input for creating a product; serializes to the insert shape
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, message = "heading must not be empty"))]
    pub heading: String,
    pub subheading: String,
    pub short_description: String,
    #[validate(length(min = 1, message = "reference must not be empty"))]
    pub reference: String,
    #[serde(default)]
    pub technical_file_url: Option<String>,
    pub size: String,
    #[serde(default)]
    pub sectors: Vec<String>,
    pub long_description: String,
    #[serde(default)]
    pub standards: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Partial product update; only present fields are written.
///
/// Nullable columns use a double option so "set to null" is distinguishable
/// from "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "heading must not be empty"))]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_file_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standards: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Option<String>>,
}

/// A product with its attached images
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetails {
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub standard_images: Vec<StandardImage>,
}

/// List row: a product and its first image, when it has one
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub product: Product,
    pub primary_image: Option<String>,
}
