use crate::partition::Partition;
use fastrand::Rng;

/// Node `0..n` split into `k` contiguous bags; the last bag takes the remainder.
pub fn uniform(n: usize, k: usize) -> Partition {
    let order: Vec<usize> = (0..n).collect();
    Partition::split_contiguous(&order, k)
}

/// A fresh uniform permutation of `0..n` split with the same bag sizes as [`uniform`].
pub fn shuffled(n: usize, k: usize, rng: &mut Rng) -> Partition {
    let mut order: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut order);
    Partition::split_contiguous(&order, k)
}
