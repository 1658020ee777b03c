use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

use chrono::{TimeZone, Utc};
use storefront_catalog::RecordValidator;
use storefront_core::{FixedClock, ProductId, ReviewId};

fn product_candidate(reviews: usize) -> Value {
    let reviews: Vec<String> = (0..reviews).map(|_| ReviewId::new().to_string()).collect();
    json!({
        "name": "Phone X",
        "category": "electronics",
        "price": 499,
        "releaseDate": "2024-09-01T00:00:00Z",
        "reviews": reviews,
    })
}

fn bench_validate_product(c: &mut Criterion) {
    let validator = RecordValidator::new();
    let mut group = c.benchmark_group("validate_product");

    for reviews in [0usize, 10, 100] {
        let candidate = product_candidate(reviews);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(reviews), &candidate, |b, candidate| {
            b.iter(|| validator.validate_product(black_box(candidate)))
        });
    }

    group.finish();
}

fn bench_validate_review(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_default();
    let validator = RecordValidator::with_clock(FixedClock(now));
    let accepted = json!({
        "reviewerName": "Ann",
        "rating": 5,
        "comment": "great",
        "product": ProductId::new().to_string(),
    });
    let rejected = json!({ "reviewerName": "", "rating": 9, "product": "x" });

    c.bench_function("validate_review/accepted", |b| {
        b.iter(|| validator.validate_review(black_box(&accepted)))
    });
    c.bench_function("validate_review/rejected", |b| {
        b.iter(|| validator.validate_review(black_box(&rejected)))
    });
}

criterion_group!(benches, bench_validate_product, bench_validate_review);
criterion_main!(benches);
