//! Catalog service: validates candidates and writes them to a document store.
//!
//! Field-level validation lives in `storefront-catalog`. This layer adds the
//! cross-record concerns the validator cannot see: product-name uniqueness
//! (owned by the store's unique index) and the review → product reference.

use serde_json::Value;
use thiserror::Error;

use storefront_catalog::{Category, Product, RecordValidator, Review};
use storefront_core::{
    Clock, DomainError, ProductId, RecordId, ReviewId, SystemClock, Violation,
};

use crate::config::CatalogConfig;
use crate::document_store::{Collection, DocumentStore, Filter, ID_FIELD, StoreError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Field violations, whether raised by validation or by the store's unique index.
    pub fn violations(&self) -> Option<&storefront_core::Violations> {
        match self {
            CatalogError::Domain(e) => e.violations(),
            CatalogError::Store(_) => None,
        }
    }
}

/// A product as stored, with its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    pub id: ProductId,
    pub product: Product,
}

/// A review as stored, with its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReview {
    pub id: ReviewId,
    pub review: Review,
}

fn document_id(document: &Value) -> Result<RecordId, StoreError> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<RecordId>().ok())
        .ok_or_else(|| StoreError::Serialization(format!("document has no valid {ID_FIELD}")))
}

impl StoredProduct {
    pub fn from_document(document: Value) -> Result<Self, StoreError> {
        let id = ProductId::from(document_id(&document)?);
        let product = serde_json::from_value(document)
            .map_err(|e| StoreError::Serialization(format!("product {id}: {e}")))?;
        Ok(Self { id, product })
    }
}

impl StoredReview {
    pub fn from_document(document: Value) -> Result<Self, StoreError> {
        let id = ReviewId::from(document_id(&document)?);
        let review = serde_json::from_value(document)
            .map_err(|e| StoreError::Serialization(format!("review {id}: {e}")))?;
        Ok(Self { id, review })
    }
}

/// Validating front door to the catalog collections.
#[derive(Debug)]
pub struct Catalog<S, C = SystemClock> {
    store: S,
    validator: RecordValidator<C>,
    config: CatalogConfig,
}

impl<S: DocumentStore> Catalog<S, SystemClock> {
    pub fn new(store: S, config: CatalogConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S: DocumentStore, C: Clock> Catalog<S, C> {
    pub fn with_clock(store: S, clock: C, config: CatalogConfig) -> Self {
        Self {
            store,
            validator: RecordValidator::with_clock(clock),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Validate and insert a product.
    ///
    /// A name already taken surfaces as `Rejected([DuplicateKey])`, the same
    /// shape as field violations.
    pub fn create_product(&self, candidate: &Value) -> Result<ProductId, CatalogError> {
        let product = self.validator.validate_product(candidate)?;

        let document = product.to_document().map_err(serialization_error)?;
        let id = self
            .store
            .insert(Collection::Products, document)
            .map_err(duplicate_as_violation)?;

        let id = ProductId::from(id);
        tracing::info!(product_id = %id, name = %product.name, "product created");
        Ok(id)
    }

    /// Validate and insert a review.
    ///
    /// The referenced product must exist only when
    /// `enforce_review_references` is on; otherwise a dangling reference is
    /// logged and stored.
    pub fn create_review(&self, candidate: &Value) -> Result<ReviewId, CatalogError> {
        let review = self.validator.validate_review(candidate)?;

        if self.find_product(review.product)?.is_none() {
            if self.config.enforce_review_references {
                return Err(DomainError::rejected(Violation::unknown_reference(
                    storefront_catalog::review::PRODUCT,
                    review.product.to_string(),
                ))
                .into());
            }
            tracing::warn!(product_id = %review.product, "review references a product that is not stored");
        }

        let document = review.to_document().map_err(serialization_error)?;
        let id = ReviewId::from(
            self.store
                .insert(Collection::Reviews, document)
                .map_err(duplicate_as_violation)?,
        );
        tracing::info!(review_id = %id, product_id = %review.product, "review created");
        Ok(id)
    }

    pub fn find_product(&self, id: ProductId) -> Result<Option<StoredProduct>, CatalogError> {
        let found = self.store.find(Collection::Products, &Filter::by_id(id))?;
        found
            .into_iter()
            .next()
            .map(StoredProduct::from_document)
            .transpose()
            .map_err(CatalogError::from)
    }

    pub fn find_review(&self, id: ReviewId) -> Result<Option<StoredReview>, CatalogError> {
        let found = self.store.find(Collection::Reviews, &Filter::by_id(id))?;
        found
            .into_iter()
            .next()
            .map(StoredReview::from_document)
            .transpose()
            .map_err(CatalogError::from)
    }

    pub fn products_in(&self, category: Category) -> Result<Vec<StoredProduct>, CatalogError> {
        let filter = Filter::new().where_eq(storefront_catalog::product::CATEGORY, category.as_str());
        self.store
            .find(Collection::Products, &filter)?
            .into_iter()
            .map(|doc| StoredProduct::from_document(doc).map_err(CatalogError::from))
            .collect()
    }

    /// Reviews whose `product` points at `product_id`, oldest insert first.
    ///
    /// This is the product → reviews relation derived from the authoritative
    /// review → product edge; `Product::reviews` is not consulted.
    pub fn reviews_for(&self, product_id: ProductId) -> Result<Vec<StoredReview>, CatalogError> {
        let filter =
            Filter::new().where_eq(storefront_catalog::review::PRODUCT, product_id.to_string());
        self.store
            .find(Collection::Reviews, &filter)?
            .into_iter()
            .map(|doc| StoredReview::from_document(doc).map_err(CatalogError::from))
            .collect()
    }
}

fn serialization_error(err: serde_json::Error) -> StoreError {
    StoreError::Serialization(err.to_string())
}

fn duplicate_as_violation(err: StoreError) -> CatalogError {
    match err {
        StoreError::DuplicateKey { field, value, .. } => {
            DomainError::rejected(Violation::duplicate_key(field, value)).into()
        }
        other => other.into(),
    }
}
