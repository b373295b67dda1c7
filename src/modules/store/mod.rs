//! Pluggable persistence capabilities
//!
//! The catalog core never talks to a concrete backend. Every service takes a
//! [`DataStore`] and/or a [`BlobStore`] and the embedding application decides
//! what backs them; [`memory`] provides in-process implementations used by the
//! test suite and local development.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::Result;

/// A persisted record: a JSON object carrying an integer `id`
pub type Record = Value;

/// Collection-oriented persistence capability.
///
/// Records are JSON objects; typed models decode at the service boundary.
/// Ids are assigned by the store on insert. All failures are surfaced as
/// [`crate::core::error::AppError::Store`] so callers can treat them as
/// expected, recoverable conditions.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch every record in `collection`. `order_by` names a field to sort
    /// by ascending; a leading `-` sorts descending.
    async fn query_all(&self, collection: &str, order_by: Option<&str>) -> Result<Vec<Record>>;

    /// Fetch the records whose `field` equals `value`.
    async fn query_where(&self, collection: &str, field: &str, value: Value)
        -> Result<Vec<Record>>;

    /// Insert a record, returning the generated id.
    async fn insert(&self, collection: &str, record: Value) -> Result<i64>;

    /// Insert a batch of records.
    async fn insert_many(&self, collection: &str, records: Vec<Value>) -> Result<()>;

    /// Merge `patch` into the record with the given id. Patching an absent
    /// id is a no-op, matching backend update-where semantics.
    async fn update(&self, collection: &str, id: i64, patch: Value) -> Result<()>;

    /// Merge `patch` into every record whose `field` equals `value`,
    /// returning how many records were touched.
    async fn update_where(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        patch: Value,
    ) -> Result<u64>;

    /// Delete records by id, returning how many existed.
    async fn delete(&self, collection: &str, ids: &[i64]) -> Result<u64>;

    /// Delete every record whose `field` equals `value`.
    async fn delete_where(&self, collection: &str, field: &str, value: Value) -> Result<u64>;
}

/// A file handed to the blob store for upload
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Extension taken from the original filename, `bin` when there is none
    pub fn extension(&self) -> &str {
        self.filename.rsplit('.').next().unwrap_or("bin")
    }
}

/// File storage capability keyed by public URL
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a file into `bucket`, returning its public URL.
    async fn upload(&self, file: FilePayload, bucket: &str) -> Result<String>;

    /// Delete the object a previously returned URL points at.
    async fn delete(&self, url: &str, bucket: &str) -> Result<()>;
}
