pub mod documentation_dto;

pub use documentation_dto::NewDocumentation;
