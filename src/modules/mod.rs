//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the persistence and file storage capabilities the domain
//! services are written against.

pub mod store;
