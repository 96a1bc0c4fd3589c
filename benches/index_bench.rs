//! Flat (full sort) vs top-k (bounded heap) backend benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vectordb::{DistanceMetric, FlatIndex, IndexBackend, TopKIndex, Vector};

fn create_random_vectors(n: usize, dim: usize) -> Vec<Vector<f32>> {
    (0..n)
        .map(|i| {
            let data: Vec<f32> = (0..dim).map(|_| rand::random::<f32>()).collect();
            Vector::dense(format!("v{}", i), data)
        })
        .collect()
}

fn benchmark_topk_vs_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("topk_vs_flat");
    group.sample_size(20);

    for &size in &[1_000, 10_000, 100_000] {
        let dim = 32;
        let candidates = create_random_vectors(size, dim);
        let query = Vector::dense("query", vec![0.5; dim]);

        group.bench_with_input(BenchmarkId::new("flat", size), &size, |b, _| {
            b.iter(|| {
                FlatIndex
                    .rank(&candidates, black_box(&query), black_box(10), DistanceMetric::Euclidean)
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("topk", size), &size, |b, _| {
            b.iter(|| {
                TopKIndex
                    .rank(&candidates, black_box(&query), black_box(10), DistanceMetric::Euclidean)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_topk_vs_flat);
criterion_main!(benches);
