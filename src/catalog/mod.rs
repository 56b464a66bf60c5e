//! Version catalog
//!
//! # Modules
//!
//! - [`types`]: data model shared by catalog files and responses
//! - [`store`]: validated in-memory catalog and its file loader
//! - [`source`]: [`CatalogSource`] seam and the shared, reloadable handle

pub mod source;
pub mod store;
pub mod types;

pub use source::{CatalogSource, SharedCatalog};
pub use store::Catalog;
