//! Benchmarks for shift estimation and the vector-field derivatives.
//!
//! Run with: cargo bench --package com-analysis --bench field_benchmarks

use com_analysis::{
    center_shifts, curl_2d, divergence, gradient, magnitude, AnalysisConfig, ComFieldResult,
    EdgeOrder, ReductionMaps,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::{Array2, Axis};
use rand::Rng;

/// Random reduction maps with a few empty scan positions.
fn generate_maps(rows: usize, cols: usize) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
    let mut rng = rand::thread_rng();
    let sum = Array2::from_shape_fn((rows, cols), |_| {
        if rng.gen_bool(0.02) {
            0.0
        } else {
            rng.gen_range(100.0..1000.0)
        }
    });
    let y = sum.mapv(|s| s * 128.0) + Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-50.0..50.0));
    let x = sum.mapv(|s| s * 128.0) + Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-50.0..50.0));
    (sum, y, x)
}

fn bench_center_shifts(c: &mut Criterion) {
    let mut group = c.benchmark_group("center_shifts");

    for size in [64, 256, 512] {
        let (sum, y, x) = generate_maps(size, size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(BenchmarkId::from_parameter(format!("{}x{}", size, size)), |b| {
            b.iter(|| center_shifts(black_box(&sum), black_box(&y), black_box(&x), 128.0, 128.0))
        });
    }

    group.finish();
}

fn bench_derivatives(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivatives");

    for size in [64, 256, 512] {
        let (sum, y, x) = generate_maps(size, size);
        let (yc, xc) = center_shifts(&sum, &y, &x, 128.0, 128.0).expect("shifts");
        let label = format!("{}x{}", size, size);

        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_function(BenchmarkId::new("gradient_rows", &label), |b| {
            b.iter(|| gradient(black_box(&yc), Axis(0), EdgeOrder::First))
        });
        group.bench_function(BenchmarkId::new("gradient_cols", &label), |b| {
            b.iter(|| gradient(black_box(&yc), Axis(1), EdgeOrder::First))
        });
        group.bench_function(BenchmarkId::new("divergence", &label), |b| {
            b.iter(|| divergence(black_box(&yc), black_box(&xc)))
        });
        group.bench_function(BenchmarkId::new("curl", &label), |b| {
            b.iter(|| curl_2d(black_box(&yc), black_box(&xc)))
        });
        group.bench_function(BenchmarkId::new("magnitude", &label), |b| {
            b.iter(|| magnitude(black_box(&yc), black_box(&xc)))
        });
    }

    group.finish();
}

fn bench_result_packaging(c: &mut Criterion) {
    let mut group = c.benchmark_group("result_packaging");
    let config = AnalysisConfig::default();

    for size in [64, 256] {
        let (sum, y, x) = generate_maps(size, size);
        let maps = ReductionMaps::real(sum, y, x).expect("maps");
        let field = ComFieldResult::from_maps(&maps, 128.0, 128.0).expect("field");

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(BenchmarkId::new("real", format!("{}x{}", size, size)), |b| {
            b.iter(|| black_box(&field).result_set(&config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_center_shifts, bench_derivatives, bench_result_packaging);
criterion_main!(benches);
