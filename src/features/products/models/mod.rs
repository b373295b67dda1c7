pub mod product;

pub use product::{Product, ProductImage, StandardImage};
