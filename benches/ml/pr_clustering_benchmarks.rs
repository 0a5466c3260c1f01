use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use prclust::{PrClustering, PrClusteringConfig, SamplingMode};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn generate_blobs(n: usize, dim: usize, centers: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    let offsets: Vec<Vec<f64>> = (0..centers)
        .map(|_| (0..dim).map(|_| rng.gen_range(-50.0..50.0)).collect())
        .collect();
    Array2::from_shape_fn((n, dim), |(i, d)| {
        offsets[i % centers][d] + rng.gen_range(-1.0..1.0)
    })
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("pr_clustering_fit");

    for size in [1_000, 5_000, 20_000] {
        let data = generate_blobs(size, 8, 6);
        group.bench_with_input(BenchmarkId::new("sqrt", size), &data, |b, data| {
            b.iter(|| {
                let config = PrClusteringConfig::new(6).with_random_seed(1);
                let mut model = PrClustering::new(config).unwrap();
                model.fit(black_box(data)).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_fit_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("pr_clustering_fit_predict");
    let data = generate_blobs(5_000, 8, 6);

    for (name, use_centroids) in [("plain", false), ("centroids", true)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let config = PrClusteringConfig::new(6)
                    .with_sampling_mode(SamplingMode::Fraction(0.05))
                    .with_centroids(use_centroids)
                    .with_random_seed(1);
                let mut model = PrClustering::new(config).unwrap();
                black_box(model.fit_predict(black_box(&data)).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit, bench_fit_predict);
criterion_main!(benches);
