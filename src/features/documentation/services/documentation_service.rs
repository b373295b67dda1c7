use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};

use crate::core::error::{AppError, Result};
use crate::features::documentation::dtos::NewDocumentation;
use crate::features::documentation::models::Documentation;
use crate::modules::store::{BlobStore, DataStore};
use crate::shared::constants::{DOCUMENTATION, DOCUMENTATION_BUCKET};

/// Service for documentation attachments
#[derive(Clone)]
pub struct DocumentationService {
    store: Arc<dyn DataStore>,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentationService {
    pub fn new(store: Arc<dyn DataStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Upload documentation files for a product, one record per successful
    /// upload.
    ///
    /// Files are independent, so they upload in parallel. A file that fails
    /// to upload or record is logged and skipped; the return value is how
    /// many made it.
    pub async fn upload(&self, product_id: i64, documents: Vec<NewDocumentation>) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let uploads = documents
            .into_iter()
            .map(|document| self.upload_one(product_id, document));
        let uploaded = join_all(uploads).await.into_iter().filter(|ok| *ok).count();

        tracing::debug!("Uploaded {} documentation file(s) for product {}", uploaded, product_id);
        Ok(uploaded)
    }

    async fn upload_one(&self, product_id: i64, document: NewDocumentation) -> bool {
        let NewDocumentation { name, file } = document;

        let file_url = match self.blobs.upload(file, DOCUMENTATION_BUCKET).await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to upload documentation file '{}': {}", name, e);
                return false;
            }
        };

        let record = json!({
            "name": name,
            "file_url": file_url,
            "product": product_id,
        });
        if let Err(e) = self.store.insert(DOCUMENTATION, record).await {
            tracing::error!("Failed to save documentation record '{}': {}", name, e);
            return false;
        }

        true
    }

    /// Documentation for a product, newest first
    pub async fn list_by_product(&self, product_id: i64) -> Result<Vec<Documentation>> {
        let records = self
            .store
            .query_where(DOCUMENTATION, "product", json!(product_id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch documentation of product {}: {}", product_id, e);
                e
            })?;

        let mut documents = records
            .into_iter()
            .map(decode_documentation)
            .collect::<Result<Vec<_>>>()?;
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(documents)
    }

    /// Delete a documentation attachment: the record first, then its file.
    pub async fn delete(&self, doc_id: i64) -> Result<()> {
        let records = self
            .store
            .query_where(DOCUMENTATION, "id", json!(doc_id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch documentation {} for deletion: {}", doc_id, e);
                e
            })?;
        let document = records
            .into_iter()
            .next()
            .map(decode_documentation)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("Documentation {} not found", doc_id)))?;

        self.store.delete(DOCUMENTATION, &[doc_id]).await.map_err(|e| {
            tracing::error!("Failed to delete documentation record {}: {}", doc_id, e);
            e
        })?;

        if let Some(url) = document.file_url {
            if let Err(e) = self.blobs.delete(&url, DOCUMENTATION_BUCKET).await {
                tracing::warn!("Failed to delete documentation file {}: {}", url, e);
            }
        }

        tracing::info!("Documentation deleted: id={}", doc_id);
        Ok(())
    }
}

fn decode_documentation(record: Value) -> Result<Documentation> {
    serde_json::from_value(record)
        .map_err(|e| AppError::Store(format!("Malformed documentation record: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::memory::{MemoryBlobStore, MemoryDataStore};
    use crate::modules::store::FilePayload;

    fn pdf(name: &str) -> NewDocumentation {
        NewDocumentation::new(
            name,
            FilePayload::new(format!("{}.pdf", name), "application/pdf", vec![1, 2, 3]),
        )
    }

    #[tokio::test]
    async fn test_upload_records_each_file() {
        let store = Arc::new(MemoryDataStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let service = DocumentationService::new(store.clone(), blobs.clone());

        let uploaded = service
            .upload(9, vec![pdf("datasheet"), pdf("certificate")])
            .await
            .unwrap();

        assert_eq!(uploaded, 2);
        assert_eq!(blobs.object_count().await, 2);

        let documents = service.list_by_product(9).await.unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents.iter().all(|d| d.product == 9));
        assert!(documents
            .iter()
            .all(|d| d.file_url.as_deref().unwrap().starts_with("memory://documentation/")));
    }

    #[tokio::test]
    async fn test_upload_nothing_is_zero() {
        let store = Arc::new(MemoryDataStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let service = DocumentationService::new(store, blobs);

        assert_eq!(service.upload(9, Vec::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_blob() {
        let store = Arc::new(MemoryDataStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let service = DocumentationService::new(store.clone(), blobs.clone());
        service.upload(9, vec![pdf("datasheet")]).await.unwrap();

        let document = service.list_by_product(9).await.unwrap().remove(0);
        service.delete(document.id.unwrap()).await.unwrap();

        assert!(service.list_by_product(9).await.unwrap().is_empty());
        assert_eq!(blobs.object_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_documentation_is_not_found() {
        let store = Arc::new(MemoryDataStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let service = DocumentationService::new(store, blobs);

        assert!(matches!(service.delete(404).await, Err(AppError::NotFound(_))));
    }
}
