pub mod dtos;
pub mod models;
pub mod picker;
pub mod selection;
pub mod services;
pub mod tree;

pub use picker::CategoryPicker;
pub use selection::SelectionState;
pub use services::CategoryService;
