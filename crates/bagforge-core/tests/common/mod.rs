#![allow(dead_code)]

use bagforge_core::optimizer::initialization;
use bagforge_core::{Partition, SimilarityMatrix};

/// `blocks` groups of `size` consecutive nodes; `within` inside a group,
/// `across` between groups, zero diagonal.
pub fn block_matrix(blocks: usize, size: usize, within: f64, across: f64) -> SimilarityMatrix {
    let n = blocks * size;
    let mut condensed = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            condensed.push(if i / size == j / size { within } else { across });
        }
    }
    SimilarityMatrix::from_condensed(&condensed, n).expect("block matrix")
}

/// Symmetric matrix with zero diagonal and off-diagonal scores in `[-1, 1)`.
pub fn random_matrix(n: usize, seed: u64) -> SimilarityMatrix {
    let mut rng = fastrand::Rng::with_seed(seed);
    let condensed: Vec<f64> = (0..n * (n - 1) / 2).map(|_| rng.f64() * 2.0 - 1.0).collect();
    SimilarityMatrix::from_condensed(&condensed, n).expect("random matrix")
}

pub fn random_start(n: usize, k: usize, seed: u64) -> Partition {
    initialization::shuffled(n, k, &mut fastrand::Rng::with_seed(seed))
}

pub fn quiet(_completed: usize, _total: usize, _best: f64) -> bool {
    true
}

/// Bags with members sorted, empty bags dropped, bags ordered by content.
pub fn sorted_bags(p: &Partition) -> Vec<Vec<usize>> {
    let mut bags: Vec<Vec<usize>> = p
        .bags()
        .iter()
        .filter(|b| !b.is_empty())
        .map(|b| {
            let mut b = b.clone();
            b.sort_unstable();
            b
        })
        .collect();
    bags.sort();
    bags
}
