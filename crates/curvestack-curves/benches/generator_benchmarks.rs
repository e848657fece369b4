//! Benchmarks for curve generation inside a calibration loop.
//!
//! Run with: cargo bench -p curvestack-curves

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use curvestack_curves::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn pillar_times(n: usize) -> Vec<f64> {
    (1..=n).map(|i| 0.5 * i as f64).collect()
}

fn trial_parameters(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.02 + 0.0005 * i as f64).collect()
}

/// OIS base curve plus an anchored basis, the shape of a typical 3M curve.
fn basis_stack(base_nodes: usize, basis_nodes: usize) -> BoundShape {
    let shape = CurveShape::additive_stack_with_counts(
        vec![
            CurveShape::interpolated_zero(Interpolation::linear()),
            CurveShape::anchored_zero(Interpolation::linear()),
        ],
        vec![base_nodes, basis_nodes],
        false,
    )
    .unwrap();
    shape
        .finalize(&pillar_times(base_nodes + basis_nodes), |t: &f64| *t)
        .unwrap()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for n in [5, 20, 50] {
        let bound = BoundShape::interpolated_zero(pillar_times(n), Interpolation::linear()).unwrap();
        let params = trial_parameters(n);
        group.bench_with_input(BenchmarkId::new("interpolated_zero", n), &params, |b, p| {
            b.iter(|| bound.generate(black_box("USD-OIS"), black_box(p)).unwrap());
        });
    }

    let stack = basis_stack(20, 10);
    let params = trial_parameters(stack.parameter_count());
    group.bench_function("basis_stack_20_10", |b| {
        b.iter(|| stack.generate(black_box("USD-3M"), black_box(&params)).unwrap());
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let stack = basis_stack(20, 10);
    let params = trial_parameters(stack.parameter_count());
    let curve = stack.generate("USD-3M", &params).unwrap();

    c.bench_function("stack_zero_rate", |b| {
        b.iter(|| curve.zero_rate(black_box(7.3)).unwrap());
    });
    c.bench_function("stack_parameter_sensitivity", |b| {
        b.iter(|| curve.zero_rate_parameter_sensitivity(black_box(7.3)).unwrap());
    });
}

fn bench_provider(c: &mut Criterion) {
    let mut provider = MulticurveProvider::new();
    let ois = BoundShape::interpolated_zero(pillar_times(20), Interpolation::linear())
        .unwrap()
        .generate("USD-OIS", &trial_parameters(20))
        .unwrap();
    provider.set_curve(Currency::USD, ois).unwrap();
    provider
        .set_curve(Currency::EUR, Arc::new(ConstantCurve::new("EUR-ESTR", 0.025)))
        .unwrap();

    let points: Vec<(f64, f64)> = (1..=40).map(|i| (0.25 * f64::from(i), 1.0)).collect();
    c.bench_function("provider_parameter_sensitivity", |b| {
        b.iter(|| {
            provider
                .parameter_sensitivity(black_box("USD-OIS"), black_box(&points))
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_generate, bench_evaluate, bench_provider);
criterion_main!(benches);
