//! Record validator bound to a clock.

use serde_json::Value;

use storefront_core::{Clock, DomainResult, SystemClock};

use crate::product::{Product, validate_product};
use crate::review::{Review, validate_review};

/// Validates Product and Review candidates before they reach storage.
///
/// Stateless apart from the clock used to default `createdAt`; share one
/// instance freely across threads.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator<C = SystemClock> {
    clock: C,
}

impl RecordValidator<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> RecordValidator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn validate_product(&self, candidate: &Value) -> DomainResult<Product> {
        validate_product(candidate)
    }

    pub fn validate_review(&self, candidate: &Value) -> DomainResult<Review> {
        validate_review(candidate, self.clock.now())
    }
}
