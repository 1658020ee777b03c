//! `storefront-core` — shared building blocks for the catalog.
//!
//! This crate contains **pure domain** primitives (no storage concerns):
//! identifiers, the injected clock, and the constraint-violation model.

pub mod clock;
pub mod error;
pub mod id;
pub mod violation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use id::{ProductId, RecordId, ReviewId};
pub use violation::{Violation, Violations};
