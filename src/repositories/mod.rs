// Repositories module - data access layer

pub mod catalog_source;
pub mod store;

pub use catalog_source::{catalog_source_for, CatalogSource, FileCatalogSource, HttpCatalogSource};
pub use store::{FileStore, InMemoryStore, KeyValueStore};
