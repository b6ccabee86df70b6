//! Benchmarks for the tiled kernels.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tilemac::{
    DispatchKernel, Matrix, ScalarKernel, ThreadCluster, TileSteps, matmul_naive, matmul_tiled,
    matmul_tiled_on,
};

const SIZES: [usize; 3] = [63, 128, 255];

fn operands(size: usize) -> (Matrix<i16>, Matrix<i16>) {
    let a = Matrix::from_fn(size, size, |i, j| ((i * 31 + j) % 100) as i16);
    let b = Matrix::from_fn(size, size, |j, k| ((j + k * 17) % 100) as i16);
    (a, b)
}

fn bench_single_core(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_core_i16");
    for &size in &SIZES {
        let (a, b) = operands(size);
        let mut out = Matrix::zeros(size, size);

        group.bench_with_input(BenchmarkId::new("naive", size), &size, |bench, _| {
            bench.iter(|| matmul_naive(black_box(a.view()), b.view(), &mut out.view_mut()));
        });
        group.bench_with_input(BenchmarkId::new("tiled_scalar", size), &size, |bench, _| {
            bench.iter(|| {
                matmul_tiled(
                    &ScalarKernel,
                    black_box(a.view()),
                    b.view(),
                    &mut out.view_mut(),
                    TileSteps::I16,
                )
            });
        });
        let kernel = DispatchKernel::detect();
        group.bench_with_input(BenchmarkId::new("tiled_dispatch", size), &size, |bench, _| {
            bench.iter(|| {
                matmul_tiled(
                    &kernel,
                    black_box(a.view()),
                    b.view(),
                    &mut out.view_mut(),
                    TileSteps::I16,
                )
            });
        });
    }
    group.finish();
}

fn bench_multi_core(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_core_i16");
    let kernel = DispatchKernel::detect();
    for &size in &SIZES {
        let (a, b) = operands(size);
        let mut out = Matrix::zeros(size, size);

        for cores in [2, 4] {
            let cluster = ThreadCluster::new(cores).unwrap();
            group.bench_with_input(BenchmarkId::new(format!("{cores}_cores"), size), &size, |bench, _| {
                bench.iter(|| {
                    matmul_tiled_on(
                        &cluster,
                        &kernel,
                        black_box(a.view()),
                        b.view(),
                        &mut out.view_mut(),
                        TileSteps::I16,
                    )
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_single_core, bench_multi_core);
criterion_main!(benches);
