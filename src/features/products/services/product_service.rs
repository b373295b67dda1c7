use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::documentation::dtos::NewDocumentation;
use crate::features::documentation::services::DocumentationService;
use crate::features::products::dtos::{NewProduct, ProductDetails, ProductPatch, ProductSummary};
use crate::features::products::models::{Product, ProductImage, StandardImage};
use crate::modules::store::{BlobStore, DataStore, FilePayload};
use crate::shared::constants::{
    DOCUMENTATION, DOCUMENTATION_BUCKET, PRODUCTS, PRODUCT_CATEGORIES, PRODUCT_IMAGES,
    PRODUCT_IMAGES_BUCKET, STANDARD_IMAGES, STANDARD_IMAGES_BUCKET,
};

/// Service for the product catalog: records plus their image and
/// documentation attachments
pub struct ProductService {
    store: Arc<dyn DataStore>,
    blobs: Arc<dyn BlobStore>,
    documentation: DocumentationService,
}

impl ProductService {
    pub fn new(store: Arc<dyn DataStore>, blobs: Arc<dyn BlobStore>) -> Self {
        let documentation = DocumentationService::new(store.clone(), blobs.clone());
        Self {
            store,
            blobs,
            documentation,
        }
    }

    /// Create a product with its attachments.
    ///
    /// The record is inserted first; image files then upload in parallel and
    /// a row is written per successful upload. Attachment failures are logged
    /// and skipped rather than failing the already-created product.
    pub async fn create(
        &self,
        input: NewProduct,
        images: Vec<FilePayload>,
        documents: Vec<NewDocumentation>,
        standards_images: Vec<FilePayload>,
    ) -> Result<i64> {
        input.validate()?;

        let record = serde_json::to_value(&input)
            .map_err(|e| AppError::Internal(format!("Failed to encode product: {}", e)))?;
        let id = self.store.insert(PRODUCTS, record).await.map_err(|e| {
            tracing::error!("Failed to create product '{}': {}", input.heading, e);
            e
        })?;

        self.attach_images(PRODUCT_IMAGES, PRODUCT_IMAGES_BUCKET, id, images)
            .await;
        self.attach_images(STANDARD_IMAGES, STANDARD_IMAGES_BUCKET, id, standards_images)
            .await;

        if !documents.is_empty() {
            self.documentation.upload(id, documents).await?;
        }

        tracing::info!("Product created: id={}", id);
        Ok(id)
    }

    /// A product with its images and standard images.
    ///
    /// Image fetch failures degrade to empty lists; only a missing product is
    /// an error.
    pub async fn get(&self, id: i64) -> Result<ProductDetails> {
        let records = self
            .store
            .query_where(PRODUCTS, "id", json!(id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch product {}: {}", id, e);
                e
            })?;
        let product = records
            .into_iter()
            .next()
            .map(decode_product)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        let images = match self.store.query_where(PRODUCT_IMAGES, "product", json!(id)).await {
            Ok(records) => records
                .into_iter()
                .map(decode_image)
                .collect::<Result<Vec<_>>>()?,
            Err(e) => {
                tracing::error!("Failed to fetch images of product {}: {}", id, e);
                Vec::new()
            }
        };

        let standard_images = match self
            .store
            .query_where(STANDARD_IMAGES, "product", json!(id))
            .await
        {
            Ok(records) => records
                .into_iter()
                .map(decode_standard_image)
                .collect::<Result<Vec<_>>>()?,
            Err(e) => {
                tracing::error!("Failed to fetch standard images of product {}: {}", id, e);
                Vec::new()
            }
        };

        Ok(ProductDetails {
            product,
            images,
            standard_images,
        })
    }

    /// All products, newest first, each with its first image when one exists
    pub async fn list(&self) -> Result<Vec<ProductSummary>> {
        let records = self
            .store
            .query_all(PRODUCTS, Some("-created_at"))
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {}", e);
                e
            })?;
        let products = records
            .into_iter()
            .map(decode_product)
            .collect::<Result<Vec<_>>>()?;

        // Primary images are independent lookups, fetched in parallel.
        Ok(join_all(products.into_iter().map(|product| self.summarize(product))).await)
    }

    async fn summarize(&self, product: Product) -> ProductSummary {
        let Some(id) = product.id else {
            return ProductSummary {
                product,
                primary_image: None,
            };
        };

        let primary_image = match self.store.query_where(PRODUCT_IMAGES, "product", json!(id)).await
        {
            Ok(records) => records
                .into_iter()
                .next()
                .and_then(|record| record.get("image_url").and_then(Value::as_str).map(String::from)),
            Err(e) => {
                tracing::error!("Failed to fetch primary image of product {}: {}", id, e);
                None
            }
        };

        ProductSummary {
            product,
            primary_image,
        }
    }

    /// Update a product and reconcile its attachments.
    ///
    /// The record patch goes first; requested image deletions then remove
    /// rows and their blobs, and new files upload and gain rows. Attachment
    /// cleanup failures are logged without failing the update.
    pub async fn update(
        &self,
        id: i64,
        patch: ProductPatch,
        new_images: Vec<FilePayload>,
        delete_image_ids: &[i64],
        new_standards_images: Vec<FilePayload>,
        delete_standard_image_ids: &[i64],
    ) -> Result<()> {
        patch.validate()?;

        let value = serde_json::to_value(&patch)
            .map_err(|e| AppError::Internal(format!("Failed to encode product patch: {}", e)))?;
        if value.as_object().is_some_and(|o| !o.is_empty()) {
            self.store.update(PRODUCTS, id, value).await.map_err(|e| {
                tracing::error!("Failed to update product {}: {}", id, e);
                e
            })?;
        }

        self.remove_images(PRODUCT_IMAGES, PRODUCT_IMAGES_BUCKET, id, delete_image_ids)
            .await;
        self.remove_images(
            STANDARD_IMAGES,
            STANDARD_IMAGES_BUCKET,
            id,
            delete_standard_image_ids,
        )
        .await;

        self.attach_images(PRODUCT_IMAGES, PRODUCT_IMAGES_BUCKET, id, new_images)
            .await;
        self.attach_images(STANDARD_IMAGES, STANDARD_IMAGES_BUCKET, id, new_standards_images)
            .await;

        tracing::info!("Product updated: id={}", id);
        Ok(())
    }

    /// Delete a product, its attachment rows, its category associations, and
    /// finally the stored files.
    pub async fn delete(&self, id: i64) -> Result<()> {
        // Collect blob URLs before the rows go away. A failed lookup is
        // logged and deletion continues without that cleanup.
        let image_urls = self.attachment_urls(PRODUCT_IMAGES, "image_url", id).await;
        let standard_urls = self.attachment_urls(STANDARD_IMAGES, "image_url", id).await;
        let document_urls = self.attachment_urls(DOCUMENTATION, "file_url", id).await;

        self.store
            .delete_where(PRODUCT_IMAGES, "product", json!(id))
            .await?;
        self.store
            .delete_where(STANDARD_IMAGES, "product", json!(id))
            .await?;
        self.store
            .delete_where(DOCUMENTATION, "product", json!(id))
            .await?;
        self.store
            .delete_where(PRODUCT_CATEGORIES, "product", json!(id))
            .await?;

        let removed = self.store.delete(PRODUCTS, &[id]).await.map_err(|e| {
            tracing::error!("Failed to delete product {}: {}", id, e);
            e
        })?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        for url in image_urls {
            if let Err(e) = self.blobs.delete(&url, PRODUCT_IMAGES_BUCKET).await {
                tracing::warn!("Failed to delete product image {}: {}", url, e);
            }
        }
        for url in standard_urls {
            if let Err(e) = self.blobs.delete(&url, STANDARD_IMAGES_BUCKET).await {
                tracing::warn!("Failed to delete standard image {}: {}", url, e);
            }
        }
        for url in document_urls {
            if let Err(e) = self.blobs.delete(&url, DOCUMENTATION_BUCKET).await {
                tracing::warn!("Failed to delete documentation file {}: {}", url, e);
            }
        }

        tracing::info!("Product deleted: id={}", id);
        Ok(())
    }

    /// Delete a single product image, row first, then the file.
    pub async fn delete_image(&self, image_id: i64) -> Result<()> {
        self.delete_image_row(PRODUCT_IMAGES, PRODUCT_IMAGES_BUCKET, image_id)
            .await
    }

    /// Delete a single standards image, row first, then the file.
    pub async fn delete_standard_image(&self, image_id: i64) -> Result<()> {
        self.delete_image_row(STANDARD_IMAGES, STANDARD_IMAGES_BUCKET, image_id)
            .await
    }

    /// Upload files in parallel and write a row per successful upload;
    /// failures are logged and skipped.
    async fn attach_images(
        &self,
        collection: &str,
        bucket: &str,
        product_id: i64,
        files: Vec<FilePayload>,
    ) {
        if files.is_empty() {
            return;
        }

        let uploads = files.into_iter().map(|file| self.blobs.upload(file, bucket));
        let urls: Vec<String> = join_all(uploads)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::error!("Image upload to bucket '{}' failed: {}", bucket, e);
                    None
                }
            })
            .collect();

        if urls.is_empty() {
            return;
        }

        let records: Vec<Value> = urls
            .iter()
            .map(|url| json!({ "image_url": url, "product": product_id }))
            .collect();
        if let Err(e) = self.store.insert_many(collection, records).await {
            tracing::error!("Failed to save {} record(s): {}", collection, e);
        }
    }

    /// Remove selected image rows of a product and clean their blobs.
    async fn remove_images(&self, collection: &str, bucket: &str, product_id: i64, ids: &[i64]) {
        if ids.is_empty() {
            return;
        }

        // Fetch URLs before the rows disappear.
        let rows = match self
            .store
            .query_where(collection, "product", json!(product_id))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to fetch {} of product {}: {}", collection, product_id, e);
                return;
            }
        };

        let doomed: Vec<(i64, Option<String>)> = rows
            .iter()
            .filter_map(|row| {
                let id = row.get("id").and_then(Value::as_i64)?;
                ids.contains(&id).then(|| {
                    (
                        id,
                        row.get("image_url").and_then(Value::as_str).map(String::from),
                    )
                })
            })
            .collect();
        if doomed.is_empty() {
            return;
        }

        let doomed_ids: Vec<i64> = doomed.iter().map(|(id, _)| *id).collect();
        if let Err(e) = self.store.delete(collection, &doomed_ids).await {
            tracing::error!("Failed to delete {} record(s): {}", collection, e);
            return;
        }

        for (_, url) in doomed {
            if let Some(url) = url {
                if let Err(e) = self.blobs.delete(&url, bucket).await {
                    tracing::warn!("Failed to delete image file {}: {}", url, e);
                }
            }
        }
    }

    async fn delete_image_row(&self, collection: &str, bucket: &str, image_id: i64) -> Result<()> {
        let records = self
            .store
            .query_where(collection, "id", json!(image_id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch image {} for deletion: {}", image_id, e);
                e
            })?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", image_id)))?;

        self.store.delete(collection, &[image_id]).await?;

        if let Some(url) = record.get("image_url").and_then(Value::as_str) {
            if let Err(e) = self.blobs.delete(url, bucket).await {
                tracing::warn!("Failed to delete image file {}: {}", url, e);
            }
        }

        Ok(())
    }

    async fn attachment_urls(&self, collection: &str, url_field: &str, product_id: i64) -> Vec<String> {
        match self
            .store
            .query_where(collection, "product", json!(product_id))
            .await
        {
            Ok(rows) => rows
                .iter()
                .filter_map(|row| row.get(url_field).and_then(Value::as_str).map(String::from))
                .collect(),
            Err(e) => {
                tracing::error!(
                    "Failed to fetch {} of product {} before deletion: {}",
                    collection,
                    product_id,
                    e
                );
                Vec::new()
            }
        }
    }
}

fn decode_product(record: Value) -> Result<Product> {
    serde_json::from_value(record)
        .map_err(|e| AppError::Store(format!("Malformed product record: {}", e)))
}

fn decode_image(record: Value) -> Result<ProductImage> {
    serde_json::from_value(record)
        .map_err(|e| AppError::Store(format!("Malformed product image record: {}", e)))
}

fn decode_standard_image(record: Value) -> Result<StandardImage> {
    serde_json::from_value(record)
        .map_err(|e| AppError::Store(format!("Malformed standard image record: {}", e)))
}
