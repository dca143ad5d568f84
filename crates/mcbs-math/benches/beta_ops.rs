//! Criterion benchmarks for the Beta numerics in `mcbs-math`.
//!
//! `beta_cdf` dominates the analytic predictive-density estimator, which
//! evaluates it at every grid node for every arm on every step.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mcbs_math::{beta_cdf, ln_beta, ln_gamma};

fn bench_ln_gamma(c: &mut Criterion) {
    c.bench_function("gamma/ln_gamma", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 1..100 {
                acc += ln_gamma(black_box(i as f64 * 0.37));
            }
            black_box(acc)
        })
    });
}

fn bench_beta_cdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("beta/cdf");
    for (name, a, b) in [
        ("uniform", 1.0, 1.0),
        ("early", 3.0, 5.0),
        ("concentrated", 800.0, 200.0),
    ] {
        group.bench_with_input(BenchmarkId::new("grid_1000", name), &(a, b), |bench, &(a, b)| {
            bench.iter(|| {
                let mut acc = 0.0;
                for i in 0..=1000 {
                    acc += beta_cdf(black_box(i as f64 / 1000.0), a, b);
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

fn bench_ln_beta(c: &mut Criterion) {
    c.bench_function("beta/ln_beta", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 1..1000 {
                acc += ln_beta(black_box(i as f64 * 0.5), 4.0);
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_ln_gamma, bench_beta_cdf, bench_ln_beta);
criterion_main!(benches);
