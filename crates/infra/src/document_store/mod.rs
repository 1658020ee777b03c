//! Document storage boundary.
//!
//! The catalog treats storage as a black box that can `insert` a document
//! (rejecting duplicates on unique fields) and `find` documents by an
//! equality filter. Query planning, transactions and pooling belong to the
//! backend, not to this crate.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{Collection, DocumentStore, Filter, ID_FIELD, StoreError};
