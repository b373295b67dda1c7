pub mod categories;
pub mod documentation;
pub mod products;
