pub mod documentation;

pub use documentation::Documentation;
