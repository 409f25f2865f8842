//! # Membership Benchmarks
//!
//! Measures triangular/trapezoidal evaluation and full fuzzification.
//!
//! Run: `cargo bench --bench membership_bench`

use compost_fis::{InferenceEngine, Measurements, MembershipFn, trapezoidal, triangular};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Benchmark raw membership functions
fn bench_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership");

    for x in [35.0, 40.0, 75.0] {
        group.bench_with_input(BenchmarkId::new("triangular", x), &x, |b, &x| {
            b.iter(|| black_box(triangular(black_box(x), 30.0, 40.0, 50.0)))
        });
        group.bench_with_input(BenchmarkId::new("trapezoidal", x), &x, |b, &x| {
            b.iter(|| black_box(trapezoidal(black_box(x), 50.0, 60.0, 80.0, 100.0)))
        });
    }

    let mf = MembershipFn::triangular(6.0, 6.75, 7.5);
    group.bench_function("enum_dispatch", |b| b.iter(|| black_box(mf.degree(black_box(7.1)))));

    group.finish();
}

/// Benchmark fuzzification of a standard reading
fn bench_fuzzify(c: &mut Criterion) {
    let engine = InferenceEngine::standard().expect("standard engine");
    let m = Measurements::standard(40.0, 45.0, 6.75);

    c.bench_function("fuzzify_standard", |b| b.iter(|| black_box(engine.fuzzify(black_box(&m)))));
}

criterion_group!(benches, bench_shapes, bench_fuzzify);
criterion_main!(benches);
