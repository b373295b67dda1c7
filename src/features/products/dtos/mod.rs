pub mod product_dto;

pub use product_dto::{NewProduct, ProductDetails, ProductPatch, ProductSummary};
