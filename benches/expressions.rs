//! Expression Benchmarks
//!
//! Measures the cost of the main operations on expression trees of increasing size:
//!
//! ### 1. Parsing (`benchmark_parsing`)
//! Reading prefix-notation formulas into trees.
//!
//! ### 2. Evaluation (`benchmark_evaluation`)
//! Scalar evaluation against a hand-written Rust closure, and vectorized evaluation
//! over 100k samples, sequential and parallel.
//!
//! ### 3. Symbolic work (`benchmark_symbolic`)
//! Differentiation followed by simplification, and analytical Taylor series.
//!
//! ### 4. Fitting (`benchmark_fitting`)
//! Polynomial interpolation through point sets of growing size.
//!
//! ## Usage
//!
//! Run with: `cargo bench --bench expressions`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use symcalc::prelude::*;

const FORMULAS: [(&str, &str); 5] = [
    ("linear", "+(*(2.2,x),1.1)"),
    ("quadratic", "*(+(*(2.2,x),1.1),3.3)"),
    ("polynomial", "/(+(-(+(^(x,3),*(2,^(x,2))),*(5,x)),1),+(+(^(x,2),*(3,x)),2))"),
    ("trigonometric", "*(s(*(p,x)),c(/(x,2)))"),
    ("mixed", "+(/(e(s(x)),+(^(x,2),1)),l(+(^(x,4),3)))"),
];

fn direct(name: &str, x: f64) -> f64 {
    match name {
        "linear" => 2.2 * x + 1.1,
        "quadratic" => (2.2 * x + 1.1) * 3.3,
        "polynomial" => (x.powi(3) + 2.0 * x.powi(2) - 5.0 * x + 1.0) / (x.powi(2) + 3.0 * x + 2.0),
        "trigonometric" => (std::f64::consts::PI * x).sin() * (x / 2.0).cos(),
        _ => x.sin().exp() / (x.powi(2) + 1.0) + (x.powi(4) + 3.0).ln(),
    }
}

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parsing");
    for (name, formula) in FORMULAS {
        group.bench_with_input(BenchmarkId::new("parse", name), formula, |b, formula| {
            b.iter(|| black_box(parse(black_box(formula))))
        });
    }
    group.finish();
}

fn benchmark_evaluation(c: &mut Criterion) {
    let samples: Vec<f64> = (0..100_000).map(|i| i as f64 * 1e-4).collect();

    let mut group = c.benchmark_group("Evaluation");
    for (name, formula) in FORMULAS {
        let expr = parse(formula).unwrap();

        group.bench_with_input(BenchmarkId::new("Direct", name), &name, |b, name| {
            b.iter(|| black_box(direct(name, black_box(2.5))))
        });
        group.bench_with_input(BenchmarkId::new("Scalar", name), &expr, |b, expr| {
            b.iter(|| black_box(expr.eval(black_box(2.5))))
        });
        group.bench_with_input(BenchmarkId::new("Samples", name), &expr, |b, expr| {
            b.iter(|| black_box(expr.eval_samples(&samples)))
        });
        group.bench_with_input(BenchmarkId::new("Parallel", name), &expr, |b, expr| {
            b.iter(|| black_box(expr.eval_samples_parallel(&samples)))
        });
    }
    group.finish();
}

fn benchmark_symbolic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Symbolic");
    for (name, formula) in FORMULAS {
        let expr = parse(formula).unwrap();
        group.bench_with_input(BenchmarkId::new("derivative", name), &expr, |b, expr| {
            b.iter(|| black_box(expr.analytical_derivative().simplify()))
        });
    }

    let sine = parse("s(x)").unwrap();
    for order in [2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("taylor", order), &order, |b, &order| {
            b.iter(|| black_box(taylor_analytical(&sine, &TaylorOptions::new(order))))
        });
    }
    group.finish();
}

fn benchmark_fitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fitting");
    for size in [4, 8, 16] {
        let points: Vec<Point> = (0..size)
            .map(|i| {
                let x = i as f64 / size as f64;
                (x, x.sin())
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("fit_polynomial", size), &points, |b, points| {
            b.iter(|| black_box(fit_polynomial(black_box(points))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_evaluation,
    benchmark_symbolic,
    benchmark_fitting
);
criterion_main!(benches);
