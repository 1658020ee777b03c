//! Field readers shared by the Product and Review validators.
//!
//! Each reader inspects one field of a candidate mapping, records any
//! violation, and returns the typed value only when the field is usable.
//! `null` is treated exactly like an absent field.

use core::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::{Map, Value};

use storefront_core::{DomainError, DomainResult, Violation, Violations};

/// Borrow the candidate as a mapping, or fail with `InvalidInput`.
pub(crate) fn as_mapping<'a>(
    candidate: &'a Value,
    record: &str,
) -> DomainResult<&'a Map<String, Value>> {
    candidate.as_object().ok_or_else(|| {
        DomainError::invalid_input(format!(
            "{record} candidate must be a mapping, found {}",
            json_kind(candidate)
        ))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn parse_datetime_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Collects violations while reading fields from one candidate.
pub(crate) struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    violations: Violations,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            violations: Violations::new(),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        match self.map.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    fn reject(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Required text; empty text counts as missing.
    pub(crate) fn required_text(&mut self, field: &str) -> Option<String> {
        match self.get(field) {
            None => {
                self.reject(Violation::missing(field));
                None
            }
            Some(Value::String(s)) if s.is_empty() => {
                self.reject(Violation::missing(field));
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.reject(Violation::invalid_type(field, "text"));
                None
            }
        }
    }

    pub(crate) fn optional_text(&mut self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.reject(Violation::invalid_type(field, "text"));
                None
            }
        }
    }

    /// Required text that must be one of `allowed` (exact, case-sensitive match).
    pub(crate) fn required_enum<T: FromStr>(
        &mut self,
        field: &str,
        allowed: &[&'static str],
    ) -> Option<T> {
        let text = self.required_text(field)?;
        match text.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.reject(Violation::invalid_enum(field, text, allowed));
                None
            }
        }
    }

    /// Required number, inclusive `min`, optional inclusive `max`.
    pub(crate) fn required_number(&mut self, field: &str, min: f64, max: Option<f64>) -> Option<f64> {
        let value = match self.get(field) {
            None => {
                self.reject(Violation::missing(field));
                return None;
            }
            Some(v) => v,
        };
        let Some(n) = value.as_f64() else {
            self.reject(Violation::invalid_type(field, "number"));
            return None;
        };
        self.in_range(field, n, min, max)
    }

    /// Required whole number, inclusive `min..=max`.
    ///
    /// `4.0` is accepted as 4; `4.5` is a type error rather than a range error.
    pub(crate) fn required_integer(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let value = match self.get(field) {
            None => {
                self.reject(Violation::missing(field));
                return None;
            }
            Some(v) => v,
        };
        let n = match value.as_f64() {
            Some(n) if n.fract() == 0.0 => n,
            _ => {
                self.reject(Violation::invalid_type(field, "integer"));
                return None;
            }
        };
        self.in_range(field, n, min as f64, Some(max as f64))
            .map(|n| n as i64)
    }

    fn in_range(&mut self, field: &str, n: f64, min: f64, max: Option<f64>) -> Option<f64> {
        let above_max = max.is_some_and(|max| n > max);
        if n < min || above_max {
            self.reject(Violation::out_of_range(field, n, min, max));
            return None;
        }
        Some(n)
    }

    pub(crate) fn optional_bool(&mut self, field: &str) -> Option<bool> {
        match self.get(field)? {
            Value::Bool(b) => Some(*b),
            _ => {
                self.reject(Violation::invalid_type(field, "boolean"));
                None
            }
        }
    }

    /// Optional date-time given as RFC 3339 text, a bare `YYYY-MM-DD` date
    /// (midnight UTC), or integer epoch milliseconds.
    ///
    /// Only years 0000..=9999 are accepted so the normalized value reads back
    /// through this same parser.
    pub(crate) fn optional_datetime(&mut self, field: &str) -> Option<DateTime<Utc>> {
        let value = self.get(field)?;
        let parsed = match value {
            Value::String(s) => parse_datetime_text(s),
            Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
            _ => None,
        }
        .filter(|dt| (0..=9999).contains(&dt.year()));
        if parsed.is_none() {
            self.reject(Violation::invalid_type(field, "date-time"));
        }
        parsed
    }

    /// Required identifier; anything that does not parse is `InvalidReference`.
    pub(crate) fn required_reference<T: FromStr>(&mut self, field: &str) -> Option<T> {
        let Some(value) = self.get(field) else {
            self.reject(Violation::missing(field));
            return None;
        };
        let parsed = value.as_str().and_then(|s| s.parse::<T>().ok());
        if parsed.is_none() {
            self.reject(Violation::invalid_reference(field));
        }
        parsed
    }

    /// Optional sequence of identifiers; absence yields an empty sequence.
    ///
    /// Malformed elements are reported individually as `field[index]`.
    pub(crate) fn reference_list<T: FromStr>(&mut self, field: &str) -> Vec<T> {
        let Some(value) = self.get(field) else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            self.reject(Violation::invalid_type(field, "sequence of identifiers"));
            return Vec::new();
        };

        let mut ids = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match item.as_str().and_then(|s| s.parse::<T>().ok()) {
                Some(id) => ids.push(id),
                None => self.reject(Violation::invalid_reference(format!("{field}[{idx}]"))),
            }
        }
        ids
    }

    /// Fields present on the candidate that the schema does not declare.
    pub(crate) fn unknown_fields(&self, known: &[&str]) -> Vec<&'a str> {
        self.map
            .keys()
            .map(String::as_str)
            .filter(|k| !known.contains(k))
            .collect()
    }

    /// Finish reading: `Ok` when nothing was rejected.
    pub(crate) fn finish(self) -> Result<(), Violations> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}
