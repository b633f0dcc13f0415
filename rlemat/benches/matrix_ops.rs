use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};
use rlemat::{RleMatrix, RleVec};
use std::hint::black_box;

fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    let mut rng = SmallRng::seed_from_u64(1);

    for size in [32, 128, 256] {
        let a = RleMatrix::random(&mut rng, size, size, -3..4, 16);
        let b = RleMatrix::random(&mut rng, size, size, -3..4, 16);
        group.bench_with_input(BenchmarkId::new("rle", size), &size, |bench, _| {
            bench.iter(|| black_box(&a * &b))
        });

        let dense_a = a.to_dense();
        let dense_b = b.to_dense();
        group.bench_with_input(BenchmarkId::new("dense", size), &size, |bench, _| {
            bench.iter(|| black_box(&dense_a * &dense_b))
        });
    }

    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    let mut rng = SmallRng::seed_from_u64(2);

    for size in [128, 512, 1024] {
        let a = RleMatrix::random(&mut rng, size, size, 0..3, 64);
        group.bench_with_input(BenchmarkId::new("transposed", size), &size, |bench, _| {
            bench.iter(|| black_box(a.transposed()))
        });
    }

    group.finish();
}

fn bench_matrix_vector(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_vector");
    let mut rng = SmallRng::seed_from_u64(3);

    for size in [256, 1024] {
        let a = RleMatrix::random(&mut rng, size, size, -2..3, 32);
        let v: RleVec = (0..size as i64).map(|i| i / 8).collect();
        group.bench_with_input(BenchmarkId::new("dot", size), &size, |bench, _| {
            bench.iter(|| black_box(a.dot(&v)))
        });
    }

    group.finish();
}

fn bench_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverse");
    let mut rng = SmallRng::seed_from_u64(4);

    for size in [16, 32, 64] {
        let a = RleMatrix::random_unimodular(&mut rng, size);
        group.bench_with_input(BenchmarkId::new("gauss_jordan", size), &size, |bench, _| {
            bench.iter(|| black_box(a.inverse()))
        });
        group.bench_with_input(BenchmarkId::new("det", size), &size, |bench, _| {
            bench.iter(|| black_box(a.det()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_matmul,
    bench_transpose,
    bench_matrix_vector,
    bench_inverse
);
criterion_main!(benches);
