//! Domain core for the FireSafe catalog admin.
//!
//! Everything here is in-process: persistence goes through the [`modules::store::DataStore`]
//! capability and file storage through [`modules::store::BlobStore`], both injected by the
//! embedding application. The crate ships in-memory implementations of both for tests and
//! local development.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;

pub use crate::core::error::{AppError, Result};
