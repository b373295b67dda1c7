#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::features::categories::models::Category;
#[cfg(test)]
use crate::modules::store::memory::MemoryDataStore;
#[cfg(test)]
use crate::modules::store::{DataStore, FilePayload};

#[cfg(test)]
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
#[allow(dead_code)]
pub fn category(id: i64, name: &str, parent: Option<i64>) -> Category {
    Category {
        id: Some(id),
        created_at: None,
        name: name.to_string(),
        slug: crate::shared::slug::slugify(name),
        parent,
        country: None,
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn png_payload(filename: &str) -> FilePayload {
    FilePayload {
        filename: filename.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

/// Memory store seeded with a 3-level chain: Doors -> Fire Doors -> Frames
#[cfg(test)]
#[allow(dead_code)]
pub async fn seeded_category_store() -> Arc<MemoryDataStore> {
    use crate::shared::constants::CATEGORIES;
    use serde_json::json;

    let store = Arc::new(MemoryDataStore::new());
    let doors = store
        .insert(
            CATEGORIES,
            json!({ "name": "Doors", "slug": "doors", "parent": null }),
        )
        .await
        .unwrap();
    let fire_doors = store
        .insert(
            CATEGORIES,
            json!({ "name": "Fire Doors", "slug": "fire-doors", "parent": doors }),
        )
        .await
        .unwrap();
    store
        .insert(
            CATEGORIES,
            json!({ "name": "Frames", "slug": "frames", "parent": fire_doors }),
        )
        .await
        .unwrap();

    store
}
