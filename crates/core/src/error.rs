//! Domain error model.

use thiserror::Error;

use crate::violation::Violations;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Field-level problems are never reported one at a time: a rejected record
/// carries every violation found in a single pass. Storage concerns belong
/// elsewhere.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// The candidate could not be inspected at all (e.g. not a mapping).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The candidate was inspected and failed one or more constraints.
    #[error("record rejected: {0}")]
    Rejected(Violations),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn rejected(violations: impl Into<Violations>) -> Self {
        Self::Rejected(violations.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// The violations of a rejected record, if this is a rejection.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            DomainError::Rejected(v) => Some(v),
            _ => None,
        }
    }
}
