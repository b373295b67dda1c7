//! In-memory Data Store and Blob Store
//!
//! Backs the test suite and local development. Ids increase monotonically
//! across all collections and `created_at` is stamped on insert when the
//! caller did not supply one, matching what a hosted backend would do.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BlobStore, DataStore, FilePayload, Record};
use crate::core::error::{AppError, Result};

type Row = Map<String, Value>;

/// In-memory [`DataStore`] with store-assigned integer ids
#[derive(Default)]
pub struct MemoryDataStore {
    collections: RwLock<HashMap<String, Vec<Row>>>,
    next_id: AtomicI64,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently in `collection`
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}

fn compare_by_field(a: &Row, b: &Row, field: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (a.get(field), b.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn row_id(row: &Row) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

fn as_object(record: Value) -> Result<Row> {
    match record {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Store(format!(
            "record must be a JSON object, got {}",
            other
        ))),
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn query_all(&self, collection: &str, order_by: Option<&str>) -> Result<Vec<Record>> {
        let collections = self.collections.read().await;
        let mut rows: Vec<Row> = collections.get(collection).cloned().unwrap_or_default();

        if let Some(sort) = order_by {
            let (field, descending) = match sort.strip_prefix('-') {
                Some(field) => (field, true),
                None => (sort, false),
            };
            // Stable sort keeps insertion order for ties.
            rows.sort_by(|a, b| {
                if descending {
                    compare_by_field(b, a, field)
                } else {
                    compare_by_field(a, b, field)
                }
            });
        }

        Ok(rows.into_iter().map(Value::Object).collect())
    }

    async fn query_where(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<Vec<Record>> {
        let collections = self.collections.read().await;
        let rows = collections
            .get(collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.get(field) == Some(&value))
                    .cloned()
                    .map(Value::Object)
                    .collect()
            })
            .unwrap_or_default();

        Ok(rows)
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<i64> {
        let mut row = as_object(record)?;
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        row.insert("id".to_string(), Value::from(id));
        row.entry("created_at".to_string())
            .or_insert_with(|| Value::from(Utc::now().to_rfc3339()));

        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().push(row);

        Ok(id)
    }

    async fn insert_many(&self, collection: &str, records: Vec<Value>) -> Result<()> {
        for record in records {
            self.insert(collection, record).await?;
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: i64, patch: Value) -> Result<()> {
        let patch = as_object(patch)?;
        let mut collections = self.collections.write().await;
        if let Some(rows) = collections.get_mut(collection) {
            if let Some(row) = rows.iter_mut().find(|row| row_id(row) == Some(id)) {
                for (key, value) in patch {
                    row.insert(key, value);
                }
            }
        }
        Ok(())
    }

    async fn update_where(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        patch: Value,
    ) -> Result<u64> {
        let patch = as_object(patch)?;
        let mut touched = 0;
        let mut collections = self.collections.write().await;
        if let Some(rows) = collections.get_mut(collection) {
            for row in rows.iter_mut().filter(|row| row.get(field) == Some(&value)) {
                for (key, value) in patch.clone() {
                    row.insert(key, value);
                }
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn delete(&self, collection: &str, ids: &[i64]) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(rows) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = rows.len();
        rows.retain(|row| !row_id(row).is_some_and(|id| ids.contains(&id)));

        Ok((before - rows.len()) as u64)
    }

    async fn delete_where(&self, collection: &str, field: &str, value: Value) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(rows) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = rows.len();
        rows.retain(|row| row.get(field) != Some(&value));

        Ok((before - rows.len()) as u64)
    }
}

struct StoredObject {
    bucket: String,
    #[allow(dead_code)]
    content_type: String,
    #[allow(dead_code)]
    bytes: Vec<u8>,
}

/// In-memory [`BlobStore`] addressing objects as `memory://{bucket}/{uuid}.{ext}`
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.objects.read().await.contains_key(url)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, file: FilePayload, bucket: &str) -> Result<String> {
        let url = format!("memory://{}/{}.{}", bucket, Uuid::new_v4(), file.extension());

        let mut objects = self.objects.write().await;
        objects.insert(
            url.clone(),
            StoredObject {
                bucket: bucket.to_string(),
                content_type: file.content_type,
                bytes: file.bytes,
            },
        );

        Ok(url)
    }

    async fn delete(&self, url: &str, bucket: &str) -> Result<()> {
        let mut objects = self.objects.write().await;
        match objects.get(url) {
            Some(object) if object.bucket == bucket => {
                objects.remove(url);
                Ok(())
            }
            Some(_) => Err(AppError::Storage(format!(
                "Object {} is not in bucket {}",
                url, bucket
            ))),
            None => Err(AppError::Storage(format!("Object {} not found", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryDataStore::new();

        let first = store.insert("categories", json!({ "name": "Doors" })).await.unwrap();
        let second = store.insert("categories", json!({ "name": "Seals" })).await.unwrap();

        assert!(second > first);
        assert_eq!(store.count("categories").await, 2);
    }

    #[tokio::test]
    async fn test_query_all_orders_ascending_and_descending() {
        let store = MemoryDataStore::new();
        store.insert("items", json!({ "name": "b", "rank": 2 })).await.unwrap();
        store.insert("items", json!({ "name": "a", "rank": 3 })).await.unwrap();
        store.insert("items", json!({ "name": "c", "rank": 1 })).await.unwrap();

        let by_name = store.query_all("items", Some("name")).await.unwrap();
        let names: Vec<&str> = by_name.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let by_rank_desc = store.query_all("items", Some("-rank")).await.unwrap();
        let ranks: Vec<i64> = by_rank_desc.iter().map(|r| r["rank"].as_i64().unwrap()).collect();
        assert_eq!(ranks, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let store = MemoryDataStore::new();
        let id = store
            .insert("categories", json!({ "name": "Doors", "parent": 7 }))
            .await
            .unwrap();

        store.update("categories", id, json!({ "parent": null })).await.unwrap();

        let rows = store.query_where("categories", "id", json!(id)).await.unwrap();
        assert_eq!(rows[0]["parent"], Value::Null);
        assert_eq!(rows[0]["name"], json!("Doors"));
    }

    #[tokio::test]
    async fn test_update_where_reports_touched_count() {
        let store = MemoryDataStore::new();
        store.insert("categories", json!({ "name": "a", "parent": 1 })).await.unwrap();
        store.insert("categories", json!({ "name": "b", "parent": 1 })).await.unwrap();
        store.insert("categories", json!({ "name": "c", "parent": 2 })).await.unwrap();

        let touched = store
            .update_where("categories", "parent", json!(1), json!({ "parent": null }))
            .await
            .unwrap();

        assert_eq!(touched, 2);
        let orphans = store
            .query_where("categories", "parent", json!(null))
            .await
            .unwrap();
        assert_eq!(orphans.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_and_delete_where() {
        let store = MemoryDataStore::new();
        let a = store.insert("pairs", json!({ "product": 1, "category": 10 })).await.unwrap();
        store.insert("pairs", json!({ "product": 1, "category": 11 })).await.unwrap();
        store.insert("pairs", json!({ "product": 2, "category": 10 })).await.unwrap();

        assert_eq!(store.delete("pairs", &[a]).await.unwrap(), 1);
        assert_eq!(store.delete_where("pairs", "product", json!(1)).await.unwrap(), 1);
        assert_eq!(store.count("pairs").await, 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_non_object() {
        let store = MemoryDataStore::new();

        assert!(store.insert("items", json!([1, 2])).await.is_err());
    }

    #[tokio::test]
    async fn test_blob_upload_and_delete() {
        let blobs = MemoryBlobStore::new();
        let payload = FilePayload::new("datasheet.pdf", "application/pdf", vec![1, 2, 3]);

        let url = blobs.upload(payload, "documentation").await.unwrap();
        assert!(url.starts_with("memory://documentation/"));
        assert!(url.ends_with(".pdf"));
        assert!(blobs.contains(&url).await);

        // Wrong bucket is refused, right bucket removes the object.
        assert!(blobs.delete(&url, "product-images").await.is_err());
        blobs.delete(&url, "documentation").await.unwrap();
        assert!(!blobs.contains(&url).await);
        assert!(blobs.delete(&url, "documentation").await.is_err());
    }
}
