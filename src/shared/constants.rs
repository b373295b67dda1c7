// =============================================================================
// DATA STORE COLLECTIONS
// =============================================================================

/// Flat category records (adjacency list via `parent`)
pub const CATEGORIES: &str = "categories";

/// Product records
pub const PRODUCTS: &str = "products";

/// Product photo records, linked via `product`
pub const PRODUCT_IMAGES: &str = "product_images";

/// Standards/certification image records, linked via `product`
pub const STANDARD_IMAGES: &str = "standard_images";

/// Join collection of `(product, category)` pairs
pub const PRODUCT_CATEGORIES: &str = "product_categories";

/// Documentation attachment records, linked via `product`
pub const DOCUMENTATION: &str = "documentation";

// =============================================================================
// BLOB STORE BUCKETS
// =============================================================================

/// Bucket for product photos
pub const PRODUCT_IMAGES_BUCKET: &str = "product-images";

/// Bucket for standards/certification images
pub const STANDARD_IMAGES_BUCKET: &str = "standard-images";

/// Bucket for documentation attachments
pub const DOCUMENTATION_BUCKET: &str = "documentation";
