//! Configuration loading and representation.
//!
//! Settings come from environment variables; anything unset or unreadable
//! falls back to the default with a warning.

/// Turns on strict checking that a review's product exists before insert.
pub const ENFORCE_REVIEW_REFERENCES_ENV: &str = "STOREFRONT_ENFORCE_REVIEW_REFERENCES";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    /// When `false` (the default) a review pointing at a missing product is
    /// stored anyway and only logged.
    pub enforce_review_references: bool,
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let enforce_review_references = match lookup(ENFORCE_REVIEW_REFERENCES_ENV) {
            None => defaults.enforce_review_references,
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    key = ENFORCE_REVIEW_REFERENCES_ENV,
                    value = %raw,
                    "unrecognised flag value; using default"
                );
                defaults.enforce_review_references
            }),
        };

        Self {
            enforce_review_references,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
