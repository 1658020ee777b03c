use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use storefront_core::RecordId;

/// Name of the storage-assigned identifier field on every stored document.
pub const ID_FIELD: &str = "_id";

/// The collections the catalog stores documents in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Reviews,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Reviews => "reviews",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("duplicate key in {collection}: {field} = {value}")]
    DuplicateKey {
        collection: Collection,
        field: String,
        value: String,
    },

    #[error("document must be a mapping")]
    InvalidDocument,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("lock poisoned")]
    LockPoisoned,
}

/// Equality filter over top-level document fields. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Map<String, Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn by_id(id: impl core::fmt::Display) -> Self {
        Self::new().where_eq(ID_FIELD, id.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

/// Storage backend for catalog documents.
pub trait DocumentStore: Send + Sync {
    /// Store `record`, assigning it a fresh identifier.
    fn insert(&self, collection: Collection, record: Value) -> Result<RecordId, StoreError>;

    /// Documents in `collection` matching `filter`, in insertion order.
    fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError>;
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn insert(&self, collection: Collection, record: Value) -> Result<RecordId, StoreError> {
        (**self).insert(collection, record)
    }

    fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        (**self).find(collection, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::new().matches(&json!({ "a": 1 })));
        assert!(Filter::new().matches(&json!({})));
    }

    #[test]
    fn filter_requires_every_field_to_match() {
        let filter = Filter::new().where_eq("category", "books").where_eq("inStock", true);
        assert!(filter.matches(&json!({ "category": "books", "inStock": true, "price": 3 })));
        assert!(!filter.matches(&json!({ "category": "books", "inStock": false })));
        assert!(!filter.matches(&json!({ "category": "books" })));
    }
}
