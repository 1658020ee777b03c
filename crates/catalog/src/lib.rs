//! Catalog records (products and their reviews) and the validator that
//! guards them.
//!
//! Everything here is deterministic domain logic: no IO and no storage.
//! Candidates arrive as JSON mappings; accepted records come back
//! normalized, with defaults applied, ready to be inserted as documents.

mod fields;
pub mod product;
pub mod review;
pub mod validator;

pub use product::{Category, Product, validate_product};
pub use review::{Rating, Review, validate_review};
pub use validator::RecordValidator;
