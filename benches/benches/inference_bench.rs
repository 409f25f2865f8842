//! # Inference Benchmarks
//!
//! Measures a full `infer` call (fuzzify → rules → aggregate → defuzzify).
//!
//! Run: `cargo bench --bench inference_bench`

use compost_fis::{DefuzzMethod, InferenceEngine, Measurements, RuleBase, TermCatalog, Variable};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn scenarios() -> Vec<(&'static str, Measurements)> {
    vec![
        ("optimal", Measurements::standard(40.0, 45.0, 6.75)),
        ("hot_dry_acidic", Measurements::standard(80.0, 20.0, 4.0)),
        ("blend", Measurements::standard(35.0, 45.0, 7.1)),
        ("undetermined", Measurements::standard(10.0, 10.0, 6.75)),
    ]
}

/// Benchmark the standard three-input engine
fn bench_standard(c: &mut Criterion) {
    let engine = InferenceEngine::standard().expect("standard engine");
    let mut group = c.benchmark_group("infer_standard");

    for (name, m) in scenarios() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &m, |b, m| {
            b.iter(|| black_box(engine.infer(black_box(m))))
        });
    }

    group.finish();
}

/// Benchmark the engine with safety overrides and five inputs
fn bench_safety(c: &mut Criterion) {
    let engine = InferenceEngine::standard_with_safety().expect("safety engine");
    let m = Measurements::standard(40.0, 45.0, 6.75)
        .with(Variable::Ammonia, 27.5)
        .with(Variable::Odor, 9.0);

    c.bench_function("infer_safety_five_inputs", |b| b.iter(|| black_box(engine.infer(black_box(&m)))));
}

/// Compare defuzzification methods
fn bench_defuzz_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("defuzz_method");
    let m = Measurements::standard(35.0, 45.0, 7.1);

    for (name, method) in [
        ("weighted_centroids", DefuzzMethod::WeightedCentroids),
        ("discrete_centroid_101", DefuzzMethod::DiscreteCentroid { samples: 101 }),
    ] {
        let engine = InferenceEngine::with_method(TermCatalog::standard(), RuleBase::standard(), method)
            .expect("engine");
        group.bench_function(name, |b| b.iter(|| black_box(engine.infer(black_box(&m)))));
    }

    group.finish();
}

criterion_group!(benches, bench_standard, bench_safety, bench_defuzz_methods);
criterion_main!(benches);
