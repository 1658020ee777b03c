use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use storefront_core::RecordId;

use super::r#trait::{Collection, DocumentStore, Filter, ID_FIELD, StoreError};

/// In-memory document store with optional per-collection unique indexes.
///
/// Intended for tests/dev. Lookups are linear scans.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
    unique: HashMap<Collection, Vec<String>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the indexes the catalog schema declares (unique product name).
    pub fn for_catalog() -> Self {
        Self::new().with_unique_index(Collection::Products, "name")
    }

    /// Reject inserts whose `field` equals that of an existing document in `collection`.
    pub fn with_unique_index(mut self, collection: Collection, field: impl Into<String>) -> Self {
        self.unique.entry(collection).or_default().push(field.into());
        self
    }

    fn key_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn check_unique(
        &self,
        collection: Collection,
        existing: &[Value],
        record: &Value,
    ) -> Result<(), StoreError> {
        let Some(fields) = self.unique.get(&collection) else {
            return Ok(());
        };

        for field in fields {
            let value = match record.get(field) {
                None | Some(Value::Null) => continue,
                Some(v) => v,
            };
            if existing.iter().any(|doc| doc.get(field) == Some(value)) {
                return Err(StoreError::DuplicateKey {
                    collection,
                    field: field.clone(),
                    value: Self::key_text(value),
                });
            }
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert(&self, collection: Collection, mut record: Value) -> Result<RecordId, StoreError> {
        if !record.is_object() {
            return Err(StoreError::InvalidDocument);
        }

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let documents = collections.entry(collection).or_default();

        // Check and insert under one write lock so uniqueness holds across callers.
        self.check_unique(collection, documents, &record)?;

        let id = RecordId::new();
        if let Some(map) = record.as_object_mut() {
            map.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        }
        documents.push(record);

        Ok(id)
    }

    fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;

        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }
}
