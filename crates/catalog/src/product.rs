//! Product records: schema, normalization and validation.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use storefront_core::{DomainError, DomainResult, ReviewId};

use crate::fields::{FieldReader, as_mapping};

pub const NAME: &str = "name";
pub const CATEGORY: &str = "category";
pub const PRICE: &str = "price";
pub const IN_STOCK: &str = "inStock";
pub const RELEASE_DATE: &str = "releaseDate";
pub const REVIEWS: &str = "reviews";

/// Lowest accepted price. There is no upper bound.
pub const MIN_PRICE: f64 = 1.0;

/// Product classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Fashion,
    Home,
    Books,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Electronics,
        Category::Fashion,
        Category::Home,
        Category::Books,
    ];

    /// Wire names of every category, in declaration order.
    pub const NAMES: [&'static str; 4] = ["electronics", "fashion", "home", "books"];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Fashion => "fashion",
            Category::Home => "home",
            Category::Books => "books",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    /// Exact, case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::invalid_input(format!("unknown category `{s}`")))
    }
}

fn default_in_stock() -> bool {
    true
}

/// A normalized Product record, exactly the payload handed to storage.
///
/// `reviews` is a denormalized back-reference list. Nothing keeps it in sync
/// with the reviews that point at this product; query reviews by product
/// instead of trusting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub category: Category,
    pub price: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviews: Vec<ReviewId>,
}

impl Product {
    /// Every field the schema declares (wire names).
    pub const FIELDS: [&'static str; 6] = [NAME, CATEGORY, PRICE, IN_STOCK, RELEASE_DATE, REVIEWS];

    /// Build a product with defaults applied (`in_stock = true`, no reviews).
    pub fn new(name: impl Into<String>, category: Category, price: f64) -> Self {
        Self {
            name: name.into(),
            category,
            price,
            in_stock: default_in_stock(),
            release_date: None,
            reviews: Vec::new(),
        }
    }

    pub fn with_release_date(mut self, release_date: DateTime<Utc>) -> Self {
        self.release_date = Some(release_date);
        self
    }

    /// The record as a storage document.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Validate a candidate Product mapping and apply defaults.
///
/// All violations are collected; a non-mapping candidate is `InvalidInput`.
/// Name uniqueness is not checked here (the store's unique index owns it).
pub fn validate_product(candidate: &Value) -> DomainResult<Product> {
    let map = as_mapping(candidate, "product")?;
    let mut fields = FieldReader::new(map);

    let name = fields.required_text(NAME);
    let category = fields.required_enum::<Category>(CATEGORY, &Category::NAMES);
    let price = fields.required_number(PRICE, MIN_PRICE, None);
    let in_stock = fields.optional_bool(IN_STOCK).unwrap_or_else(default_in_stock);
    let release_date = fields.optional_datetime(RELEASE_DATE);
    let reviews = fields.reference_list::<ReviewId>(REVIEWS);

    let unknown = fields.unknown_fields(&Product::FIELDS);
    if !unknown.is_empty() {
        tracing::debug!(?unknown, "dropping undeclared product fields");
    }

    match (fields.finish(), name, category, price) {
        (Ok(()), Some(name), Some(category), Some(price)) => Ok(Product {
            name,
            category,
            price,
            in_stock,
            release_date,
            reviews,
        }),
        (Err(violations), ..) => {
            tracing::debug!(%violations, "product candidate rejected");
            Err(DomainError::Rejected(violations))
        }
        // Every unusable required field above has already recorded a violation.
        (Ok(()), ..) => Err(DomainError::invalid_input("incomplete product candidate")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_core::Violation;

    fn violations_of(candidate: Value) -> Vec<Violation> {
        match validate_product(&candidate) {
            Err(DomainError::Rejected(v)) => v.into_vec(),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn accepts_minimal_product_and_defaults_in_stock() {
        let product =
            validate_product(&json!({ "name": "Phone X", "category": "electronics", "price": 499 }))
                .unwrap();

        assert_eq!(product, Product::new("Phone X", Category::Electronics, 499.0));
        assert!(product.in_stock);
        assert!(product.reviews.is_empty());
        assert_eq!(product.release_date, None);
    }

    #[test]
    fn normalized_document_includes_in_stock() {
        let product =
            validate_product(&json!({ "name": "Phone X", "category": "electronics", "price": 499 }))
                .unwrap();
        let doc = product.to_document().unwrap();

        assert_eq!(doc["inStock"], json!(true));
        assert_eq!(doc["reviews"], json!([]));
        assert!(doc.get("releaseDate").is_none());
    }

    #[test]
    fn rejects_unknown_category_with_allowed_values() {
        let violations =
            violations_of(json!({ "name": "Phone X", "category": "toys", "price": 499 }));
        assert_eq!(
            violations,
            vec![Violation::invalid_enum(
                "category",
                "toys",
                &["electronics", "fashion", "home", "books"]
            )]
        );
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let violations = violations_of(json!({ "name": "Dune", "category": "Books", "price": 10 }));
        assert!(matches!(
            &violations[..],
            [Violation::InvalidEnumValue { field, value, .. }] if field == "category" && value == "Books"
        ));
    }

    #[test]
    fn rejects_missing_name() {
        let violations = violations_of(json!({ "category": "books", "price": 10 }));
        assert_eq!(violations, vec![Violation::missing("name")]);
    }

    #[test]
    fn collects_every_violation() {
        let violations = violations_of(json!({
            "category": 3,
            "price": 0,
            "inStock": "yes",
            "releaseDate": "soon",
            "reviews": "none",
        }));

        assert_eq!(
            violations,
            vec![
                Violation::missing("name"),
                Violation::invalid_type("category", "text"),
                Violation::out_of_range("price", 0.0, 1.0, None),
                Violation::invalid_type("inStock", "boolean"),
                Violation::invalid_type("releaseDate", "date-time"),
                Violation::invalid_type("reviews", "sequence of identifiers"),
            ]
        );
    }

    #[test]
    fn price_must_be_numeric_and_at_least_one() {
        assert_eq!(
            violations_of(json!({ "name": "Lamp", "category": "home", "price": "12" })),
            vec![Violation::invalid_type("price", "number")]
        );
        assert_eq!(
            violations_of(json!({ "name": "Lamp", "category": "home", "price": 0.99 })),
            vec![Violation::out_of_range("price", 0.99, 1.0, None)]
        );

        let product =
            validate_product(&json!({ "name": "Lamp", "category": "home", "price": 1 })).unwrap();
        assert_eq!(product.price, 1.0);
    }

    #[test]
    fn keeps_explicit_optional_fields() {
        let review_id = ReviewId::new();
        let product = validate_product(&json!({
            "name": "Scarf",
            "category": "fashion",
            "price": 25.5,
            "inStock": false,
            "releaseDate": "2023-11-05T09:30:00Z",
            "reviews": [review_id.to_string()],
        }))
        .unwrap();

        assert!(!product.in_stock);
        assert_eq!(
            product.release_date.map(|d| d.to_rfc3339()),
            Some("2023-11-05T09:30:00+00:00".to_string())
        );
        assert_eq!(product.reviews, vec![review_id]);
    }

    #[test]
    fn release_date_past_year_9999_is_rejected() {
        let violations = violations_of(json!({
            "name": "Thing",
            "category": "books",
            "price": 10,
            "releaseDate": 300_000_000_000_000i64,
        }));
        assert_eq!(violations, vec![Violation::invalid_type("releaseDate", "date-time")]);
    }

    #[test]
    fn space_only_name_is_accepted() {
        let product =
            validate_product(&json!({ "name": "   ", "category": "books", "price": 10 })).unwrap();
        assert_eq!(product.name, "   ");

        assert_eq!(
            violations_of(json!({ "name": "", "category": "books", "price": 10 })),
            vec![Violation::missing("name")]
        );
    }

    #[test]
    fn malformed_review_ids_are_reported_by_position() {
        let violations = violations_of(json!({
            "name": "Scarf",
            "category": "fashion",
            "price": 25,
            "reviews": [ReviewId::new().to_string(), "abc"],
        }));
        assert_eq!(violations, vec![Violation::invalid_reference("reviews[1]")]);
    }

    #[test]
    fn undeclared_fields_are_dropped() {
        let product = validate_product(&json!({
            "_id": "whatever",
            "name": "Kettle",
            "category": "home",
            "price": 40,
            "color": "red",
        }))
        .unwrap();

        let doc = product.to_document().unwrap();
        assert!(doc.get("_id").is_none());
        assert!(doc.get("color").is_none());
    }

    #[test]
    fn non_mapping_candidate_is_invalid_input() {
        let err = validate_product(&json!("Phone X")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn category_round_trips_through_wire_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// 0000-01-01T00:00:00Z and 9999-12-31T23:59:59.999Z in epoch milliseconds.
        const FIRST_MS: i64 = -62_167_219_200_000;
        const LAST_MS: i64 = 253_402_300_799_999;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any category outside the enumeration is rejected on `category`.
            #[test]
            fn unknown_category_is_rejected(
                category in "[A-Za-z]{1,12}".prop_filter(
                    "must be outside the enumeration",
                    |c| !Category::NAMES.contains(&c.as_str()),
                ),
            ) {
                let result = validate_product(&json!({
                    "name": "Thing",
                    "category": category,
                    "price": 10,
                }));
                let violations = match result {
                    Err(DomainError::Rejected(v)) => v,
                    other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
                };
                let on_category = violations.iter().any(|v| matches!(
                    v,
                    Violation::InvalidEnumValue { field, .. } if field == "category"
                ));
                prop_assert!(on_category, "expected an enum violation on category, got {}", violations);
            }

            /// Property: any price below 1 is rejected as out of range.
            #[test]
            fn price_below_one_is_rejected(price in -1.0e9f64..1.0) {
                let result = validate_product(&json!({
                    "name": "Thing",
                    "category": "books",
                    "price": price,
                }));
                let violations = match result {
                    Err(DomainError::Rejected(v)) => v,
                    other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
                };
                prop_assert_eq!(
                    violations.as_slice(),
                    &[Violation::out_of_range("price", price, 1.0, None)]
                );
            }

            /// Property: validating a normalized product again yields the same product.
            #[test]
            fn normalization_is_idempotent(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                idx in 0usize..4,
                price in 1.0f64..1.0e7,
                in_stock in proptest::option::of(any::<bool>()),
                release_millis in proptest::option::of(-100_000_000_000_000i64..400_000_000_000_000),
            ) {
                let mut candidate = json!({
                    "name": name,
                    "category": Category::NAMES[idx],
                    "price": price,
                });
                if let Some(in_stock) = in_stock {
                    candidate["inStock"] = json!(in_stock);
                }
                if let Some(ms) = release_millis {
                    candidate["releaseDate"] = json!(ms);
                }

                let four_digit_year = (FIRST_MS..=LAST_MS).contains(&release_millis.unwrap_or(0));
                let first = match validate_product(&candidate) {
                    Ok(product) => product,
                    Err(err) => {
                        prop_assert!(!four_digit_year, "unexpected {:?}", err);
                        prop_assert_eq!(
                            err,
                            DomainError::rejected(Violation::invalid_type("releaseDate", "date-time"))
                        );
                        return Ok(());
                    }
                };
                prop_assert!(four_digit_year);
                let second = validate_product(&first.to_document().unwrap()).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}
