use bagforge_core::optimizer::{initialization, LocalSearch};
use bagforge_core::SimilarityMatrix;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn setup_matrix(n: usize) -> SimilarityMatrix {
    let mut rng = fastrand::Rng::with_seed(1234);
    let condensed: Vec<f64> = (0..n * (n - 1) / 2).map(|_| rng.f64()).collect();
    SimilarityMatrix::from_condensed(&condensed, n).expect("Failed to build matrix")
}

fn bench_descent(c: &mut Criterion) {
    let m = setup_matrix(144);
    let search = LocalSearch::new(&m);
    let mut rng = fastrand::Rng::with_seed(7);

    c.bench_function("descend_144_nodes_6_bags", |b| {
        b.iter(|| {
            let mut p = initialization::shuffled(144, 6, &mut rng);
            black_box(search.descend(&mut p).expect("descent failed"))
        })
    });

    let start = initialization::uniform(144, 6);
    c.bench_function("best_move_144_nodes_6_bags", |b| {
        b.iter(|| black_box(search.best_move(black_box(&start))))
    });
}

criterion_group!(benches, bench_descent);
criterion_main!(benches);
