//! Constraint violations: the `(field, reason)` pairs reported for a rejected record.

use serde::Serialize;
use thiserror::Error;

/// A single reason a candidate record failed validation.
///
/// Field names use the wire (camelCase) spelling of the record, e.g.
/// `inStock` or `reviews[2]` for an element of a sequence.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A required field was absent, `null`, or blank text.
    #[error("{field}: required field is missing")]
    MissingRequiredField { field: String },

    /// A text field held a value outside its enumeration (comparison is case-sensitive).
    #[error("{field}: `{value}` is not one of [{}]", .allowed.join(", "))]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: Vec<&'static str>,
    },

    /// A numeric field fell outside its inclusive range. `max` is `None` when unbounded.
    #[error("{field}: {value} is outside {}", range_text(.min, .max))]
    OutOfRangeValue {
        field: String,
        value: f64,
        min: f64,
        max: Option<f64>,
    },

    /// A field held a value of the wrong JSON type (or an unparsable date-time).
    #[error("{field}: expected {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    /// An identifier was syntactically malformed. Existence is not checked here.
    #[error("{field}: malformed identifier")]
    InvalidReference { field: String },

    /// The storage backend rejected the write because a unique field already holds `value`.
    #[error("{field}: `{value}` already exists")]
    DuplicateKey { field: String, value: String },

    /// Strict reference checking found no record for `id`.
    #[error("{field}: no record with id {id}")]
    UnknownReference { field: String, id: String },
}

fn range_text(min: &f64, max: &Option<f64>) -> String {
    match max {
        Some(max) => format!("[{min}, {max}]"),
        None => format!("[{min}, ∞)"),
    }
}

impl Violation {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&'static str],
    ) -> Self {
        Self::InvalidEnumValue {
            field: field.into(),
            value: value.into(),
            allowed: allowed.to_vec(),
        }
    }

    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: Option<f64>) -> Self {
        Self::OutOfRangeValue {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
        }
    }

    pub fn invalid_reference(field: impl Into<String>) -> Self {
        Self::InvalidReference {
            field: field.into(),
        }
    }

    pub fn duplicate_key(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn unknown_reference(field: impl Into<String>, id: impl Into<String>) -> Self {
        Self::UnknownReference {
            field: field.into(),
            id: id.into(),
        }
    }

    /// The field this violation is about.
    pub fn field(&self) -> &str {
        match self {
            Violation::MissingRequiredField { field }
            | Violation::InvalidEnumValue { field, .. }
            | Violation::OutOfRangeValue { field, .. }
            | Violation::InvalidType { field, .. }
            | Violation::InvalidReference { field }
            | Violation::DuplicateKey { field, .. }
            | Violation::UnknownReference { field, .. } => field,
        }
    }
}

/// Every violation found for one record, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// True if any violation concerns `field`.
    pub fn touches(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field() == field)
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl From<Violation> for Violations {
    fn from(value: Violation) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(value: Vec<Violation>) -> Self {
        Self(value)
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = core::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (idx, v) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            core::fmt::Display::fmt(v, f)?;
        }
        Ok(())
    }
}
