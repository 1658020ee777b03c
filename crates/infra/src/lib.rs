//! Infrastructure layer: document storage, the catalog service, config.

pub mod catalog;
pub mod config;
pub mod document_store;

pub use catalog::{Catalog, CatalogError, StoredProduct, StoredReview};
pub use config::CatalogConfig;
pub use document_store::{Collection, DocumentStore, Filter, InMemoryDocumentStore, StoreError};
