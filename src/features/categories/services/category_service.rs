use std::sync::Arc;

use serde_json::{json, Value};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryPatch, NewCategory};
use crate::features::categories::models::Category;
use crate::features::categories::tree::resolve_path;
use crate::modules::store::DataStore;
use crate::shared::constants::{CATEGORIES, PRODUCT_CATEGORIES};
use crate::shared::slug::slugify;

/// Service for category persistence and product association
pub struct CategoryService {
    store: Arc<dyn DataStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// All categories ordered by name; the snapshot trees are built from
    pub async fn list(&self) -> Result<Vec<Category>> {
        let records = self
            .store
            .query_all(CATEGORIES, Some("name"))
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {}", e);
                e
            })?;

        records.into_iter().map(decode_category).collect()
    }

    /// Get a category by id
    pub async fn get_by_id(&self, id: i64) -> Result<Category> {
        let records = self
            .store
            .query_where(CATEGORIES, "id", json!(id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch category {}: {}", id, e);
                e
            })?;

        records
            .into_iter()
            .next()
            .map(decode_category)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Create a category, deriving the slug from the name when none is given
    pub async fn create(&self, input: NewCategory) -> Result<i64> {
        input.validate()?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }

        let slug = match input.slug.as_deref() {
            Some(supplied) if !slugify(supplied).is_empty() => slugify(supplied),
            _ => slugify(&name),
        };

        let record = json!({
            "name": name,
            "slug": slug,
            "parent": input.parent,
            "country": input.country,
        });

        let id = self.store.insert(CATEGORIES, record).await.map_err(|e| {
            tracing::error!("Failed to create category '{}': {}", name, e);
            e
        })?;

        tracing::info!("Category created: id={}, slug={}", id, slug);
        Ok(id)
    }

    /// Update name/slug/parent/country in place
    pub async fn update(&self, id: i64, patch: CategoryPatch) -> Result<()> {
        patch.validate()?;

        let value = serde_json::to_value(&patch)
            .map_err(|e| AppError::Internal(format!("Failed to encode category patch: {}", e)))?;
        if value.as_object().is_none_or(|o| o.is_empty()) {
            return Ok(());
        }

        self.store.update(CATEGORIES, id, value).await.map_err(|e| {
            tracing::error!("Failed to update category {}: {}", id, e);
            e
        })
    }

    /// Delete a category.
    ///
    /// Sequenced cascade: product associations are removed first, then the
    /// children are re-rooted, then the record itself is deleted. A failure
    /// at any step aborts the rest.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store
            .delete_where(PRODUCT_CATEGORIES, "category", json!(id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove product associations for category {}: {}", id, e);
                e
            })?;

        self.store
            .update_where(CATEGORIES, "parent", json!(id), json!({ "parent": null }))
            .await
            .map_err(|e| {
                tracing::error!("Failed to re-root children of category {}: {}", id, e);
                e
            })?;

        let removed = self.store.delete(CATEGORIES, &[id]).await.map_err(|e| {
            tracing::error!("Failed to delete category {}: {}", id, e);
            e
        })?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }

    /// Replace a product's category associations with the given set
    pub async fn set_product_categories(&self, product_id: i64, category_ids: &[i64]) -> Result<()> {
        self.store
            .delete_where(PRODUCT_CATEGORIES, "product", json!(product_id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear categories of product {}: {}", product_id, e);
                e
            })?;

        if category_ids.is_empty() {
            return Ok(());
        }

        let records: Vec<Value> = category_ids
            .iter()
            .map(|category_id| json!({ "product": product_id, "category": category_id }))
            .collect();

        self.store
            .insert_many(PRODUCT_CATEGORIES, records)
            .await
            .map_err(|e| {
                tracing::error!("Failed to associate product {} with categories: {}", product_id, e);
                e
            })
    }

    /// Category ids associated with a product, in store order
    pub async fn categories_of_product(&self, product_id: i64) -> Result<Vec<i64>> {
        let records = self
            .store
            .query_where(PRODUCT_CATEGORIES, "product", json!(product_id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch categories of product {}: {}", product_id, e);
                e
            })?;

        records
            .into_iter()
            .map(|record| {
                record
                    .get("category")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| AppError::Store("association record missing category id".to_string()))
            })
            .collect()
    }

    /// One root-to-leaf breadcrumb path per associated category.
    ///
    /// Paths come back in association order; an association whose leaf no
    /// longer resolves is omitted rather than failing the whole row set.
    pub async fn breadcrumbs(&self, product_id: i64) -> Result<Vec<Vec<Category>>> {
        let leaf_ids = self.categories_of_product(product_id).await?;
        if leaf_ids.is_empty() {
            return Ok(Vec::new());
        }

        let categories = self.list().await?;
        Ok(leaf_ids
            .into_iter()
            .map(|leaf| resolve_path(leaf, &categories))
            .filter(|path| !path.is_empty())
            .collect())
    }
}

fn decode_category(record: Value) -> Result<Category> {
    serde_json::from_value(record)
        .map_err(|e| AppError::Store(format!("Malformed category record: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::memory::MemoryDataStore;
    use crate::shared::test_helpers::seeded_category_store;

    fn service(store: &Arc<MemoryDataStore>) -> CategoryService {
        CategoryService::new(store.clone() as Arc<dyn DataStore>)
    }

    #[tokio::test]
    async fn test_create_derives_slug_from_name() {
        let store = Arc::new(MemoryDataStore::new());
        let service = service(&store);

        let id = service
            .create(NewCategory::named("Fire Doors & Frames", None))
            .await
            .unwrap();

        let category = service.get_by_id(id).await.unwrap();
        assert_eq!(category.slug, "fire-doors-frames");
        assert_eq!(category.name, "Fire Doors & Frames");
        assert_eq!(category.parent, None);
    }

    #[tokio::test]
    async fn test_create_normalizes_supplied_slug() {
        let store = Arc::new(MemoryDataStore::new());
        let service = service(&store);

        let input = NewCategory {
            name: "Doors".to_string(),
            slug: Some("  already-a-slug ".to_string()),
            parent: None,
            country: None,
        };
        let id = service.create(input).await.unwrap();

        assert_eq!(service.get_by_id(id).await.unwrap().slug, "already-a-slug");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let store = Arc::new(MemoryDataStore::new());
        let service = service(&store);

        let result = service.create(NewCategory::named("   ", None)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.count(CATEGORIES).await, 0);
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let store = Arc::new(MemoryDataStore::new());
        let service = service(&store);
        service.create(NewCategory::named("Signage", None)).await.unwrap();
        service.create(NewCategory::named("Doors", None)).await.unwrap();

        let names: Vec<String> = service.list().await.unwrap().into_iter().map(|c| c.name).collect();

        assert_eq!(names, vec!["Doors", "Signage"]);
    }

    #[tokio::test]
    async fn test_update_can_null_out_parent() {
        let store = Arc::new(MemoryDataStore::new());
        let service = service(&store);
        let root = service.create(NewCategory::named("Doors", None)).await.unwrap();
        let child = service.create(NewCategory::named("Seals", Some(root))).await.unwrap();

        let patch = CategoryPatch {
            parent: Some(None),
            ..Default::default()
        };
        service.update(child, patch).await.unwrap();

        assert_eq!(service.get_by_id(child).await.unwrap().parent, None);
    }

    #[tokio::test]
    async fn test_delete_cascades_associations_and_reroots_children() {
        let store = seeded_category_store().await;
        let service = service(&store);

        let categories = service.list().await.unwrap();
        let doors = categories.iter().find(|c| c.slug == "doors").unwrap().id.unwrap();
        let fire_doors = categories.iter().find(|c| c.slug == "fire-doors").unwrap().id.unwrap();

        service.set_product_categories(42, &[fire_doors]).await.unwrap();
        service.delete(fire_doors).await.unwrap();

        // Association rows for the deleted category are gone.
        assert!(service.categories_of_product(42).await.unwrap().is_empty());

        // Its child was re-rooted, not deleted.
        let remaining = service.list().await.unwrap();
        assert_eq!(remaining.len(), 2);
        let frames = remaining.iter().find(|c| c.slug == "frames").unwrap();
        assert_eq!(frames.parent, None);

        // The other root is untouched.
        assert!(remaining.iter().any(|c| c.id == Some(doors)));
    }

    #[tokio::test]
    async fn test_delete_unknown_category_is_not_found() {
        let store = Arc::new(MemoryDataStore::new());
        let service = service(&store);

        assert!(matches!(service.delete(99).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_product_categories_replaces_existing() {
        let store = Arc::new(MemoryDataStore::new());
        let service = service(&store);

        service.set_product_categories(7, &[1, 2]).await.unwrap();
        service.set_product_categories(7, &[3]).await.unwrap();

        assert_eq!(service.categories_of_product(7).await.unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn test_breadcrumbs_one_path_per_association() {
        let store = seeded_category_store().await;
        let service = service(&store);

        let categories = service.list().await.unwrap();
        let doors = categories.iter().find(|c| c.slug == "doors").unwrap().id.unwrap();
        let frames = categories.iter().find(|c| c.slug == "frames").unwrap().id.unwrap();

        // One resolvable leaf, one root, one dangling reference.
        service.set_product_categories(7, &[frames, doors, 999]).await.unwrap();

        let paths = service.breadcrumbs(7).await.unwrap();

        assert_eq!(paths.len(), 2);
        let first: Vec<&str> = paths[0].iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(first, vec!["doors", "fire-doors", "frames"]);
        let second: Vec<&str> = paths[1].iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(second, vec!["doors"]);
    }

    #[tokio::test]
    async fn test_breadcrumbs_without_associations_is_empty() {
        let store = Arc::new(MemoryDataStore::new());
        let service = service(&store);

        assert!(service.breadcrumbs(1).await.unwrap().is_empty());
    }
}
