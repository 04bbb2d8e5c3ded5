use criterion::{black_box, criterion_group, criterion_main, Criterion};
use density_order::cluster::{Dbscan, DistanceMatrix, LinearScan, Optics, Points, Xi};
use rand::prelude::*;

fn blobs(rng: &mut StdRng, n: usize, d: usize, centers: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            let c = (i % centers) as f64 * 10.0;
            (0..d).map(|_| c + rng.random::<f64>()).collect()
        })
        .collect()
}

fn bench_density(c: &mut Criterion) {
    let mut group = c.benchmark_group("density");

    // Generate synthetic data
    let mut rng = StdRng::seed_from_u64(42);
    let data = blobs(&mut rng, 1000, 8, 5);
    let points = Points::euclidean(&data).unwrap();
    let query = LinearScan::new(DistanceMatrix::from_oracle(&points).unwrap());

    group.bench_function("dbscan_n1000_d8", |b| {
        b.iter(|| {
            Dbscan::new(1.5, 5).run(black_box(&query)).unwrap();
        })
    });

    group.bench_function("optics_n1000_d8", |b| {
        b.iter(|| {
            Optics::new(3.0, 5).cluster_order(black_box(&query)).unwrap();
        })
    });

    let order = Optics::new(3.0, 5).cluster_order(&query).unwrap();
    group.bench_function("xi_n1000", |b| {
        b.iter(|| {
            Xi::new(0.05, 5).extract(black_box(&order)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_density);
criterion_main!(benches);
