use std::env;

use crate::shared::constants::{
    DOCUMENTATION_BUCKET, PRODUCT_IMAGES_BUCKET, STANDARD_IMAGES_BUCKET,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
}

/// Connection settings for the external Data Store backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend API
    pub url: String,
    /// API key used for all requests
    pub api_key: String,
}

/// Blob Store bucket names for uploaded files
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket for product photos
    pub product_images_bucket: String,
    /// Bucket for standards/certification images
    pub standard_images_bucket: String,
    /// Bucket for documentation attachments (datasheets, certificates)
    pub documentation_bucket: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            backend: BackendConfig::from_env()?,
            storage: StorageConfig::from_env()?,
        })
    }
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATA_STORE_URL").map_err(|_| "DATA_STORE_URL must be set".to_string())?;
        let api_key =
            env::var("DATA_STORE_API_KEY").map_err(|_| "DATA_STORE_API_KEY must be set".to_string())?;

        if url.is_empty() {
            return Err("DATA_STORE_URL must not be empty".to_string());
        }

        Ok(Self { url, api_key })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let product_images_bucket = env::var("PRODUCT_IMAGES_BUCKET")
            .unwrap_or_else(|_| PRODUCT_IMAGES_BUCKET.to_string());
        let standard_images_bucket = env::var("STANDARD_IMAGES_BUCKET")
            .unwrap_or_else(|_| STANDARD_IMAGES_BUCKET.to_string());
        let documentation_bucket = env::var("DOCUMENTATION_BUCKET")
            .unwrap_or_else(|_| DOCUMENTATION_BUCKET.to_string());

        Ok(Self {
            product_images_bucket,
            standard_images_bucket,
            documentation_bucket,
        })
    }
}
