pub mod documentation_service;

pub use documentation_service::DocumentationService;
