//! Review records: schema, normalization and validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use storefront_core::{DomainError, DomainResult, ProductId, Violation};

use crate::fields::{FieldReader, as_mapping};

pub const REVIEWER_NAME: &str = "reviewerName";
pub const RATING: &str = "rating";
pub const COMMENT: &str = "comment";
pub const CREATED_AT: &str = "createdAt";
pub const PRODUCT: &str = "product";

/// Star rating, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            DomainError::rejected(Violation::out_of_range(
                RATING,
                f64::from(value),
                f64::from(Self::MIN),
                Some(f64::from(Self::MAX)),
            ))
        })
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// A normalized Review record, exactly the payload handed to storage.
///
/// `product` is the authoritative edge between the two record kinds. Its
/// existence is advisory: nothing here checks that the product is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub reviewer_name: String,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product: ProductId,
}

impl Review {
    /// Every field the schema declares (wire names).
    pub const FIELDS: [&'static str; 5] = [REVIEWER_NAME, RATING, COMMENT, CREATED_AT, PRODUCT];

    /// The record as a storage document.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Validate a candidate Review mapping and apply defaults.
///
/// `now` becomes `createdAt` when the candidate has none. The referenced
/// product is only checked for identifier syntax.
pub fn validate_review(candidate: &Value, now: DateTime<Utc>) -> DomainResult<Review> {
    let map = as_mapping(candidate, "review")?;
    let mut fields = FieldReader::new(map);

    let reviewer_name = fields.required_text(REVIEWER_NAME);
    let rating = fields
        .required_integer(RATING, i64::from(Rating::MIN), i64::from(Rating::MAX))
        .and_then(|n| u8::try_from(n).ok())
        .and_then(Rating::new);
    let comment = fields.optional_text(COMMENT);
    let created_at = fields.optional_datetime(CREATED_AT).unwrap_or(now);
    let product = fields.required_reference::<ProductId>(PRODUCT);

    let unknown = fields.unknown_fields(&Review::FIELDS);
    if !unknown.is_empty() {
        tracing::debug!(?unknown, "dropping undeclared review fields");
    }

    match (fields.finish(), reviewer_name, rating, product) {
        (Ok(()), Some(reviewer_name), Some(rating), Some(product)) => Ok(Review {
            reviewer_name,
            rating,
            comment,
            created_at,
            product,
        }),
        (Err(violations), ..) => {
            tracing::debug!(%violations, "review candidate rejected");
            Err(DomainError::Rejected(violations))
        }
        // Every unusable required field above has already recorded a violation.
        (Ok(()), ..) => Err(DomainError::invalid_input("incomplete review candidate")),
    }
}
