//! Partition cost and move benefits.
//!
//! Two pair-counting conventions coexist here and must not be mixed:
//! [`total_cost`] counts each unordered pair inside a bag once plus each
//! diagonal term once, while [`local_cost`] sums a node's similarity to every
//! member of its list, itself included. Benefits are built from the latter;
//! a positive benefit marks an improving move.
//!
//! All sums run in bag order with plain `f64` accumulation.

use crate::matrix::SimilarityMatrix;
use crate::partition::Partition;

/// Sum over bags of `M[p][q]` for every position pair `p <= q` in the bag.
pub fn total_cost(partition: &Partition, m: &SimilarityMatrix) -> f64 {
    let mut t = 0.0;
    for bag in partition.bags() {
        for (a, &p) in bag.iter().enumerate() {
            let row = m.row(p);
            for &q in &bag[a..] {
                t += row[q];
            }
        }
    }
    t
}

/// For each node, its summed similarity to every node of `nodes` (itself included).
pub fn local_cost(nodes: &[usize], m: &SimilarityMatrix) -> Vec<f64> {
    cross_cost(nodes, nodes, m)
}

/// For each node of `from`, its summed similarity to every node of `to`.
pub fn cross_cost(from: &[usize], to: &[usize], m: &SimilarityMatrix) -> Vec<f64> {
    from.iter()
        .map(|&p| {
            let row = m.row(p);
            to.iter().map(|&q| row[q]).sum()
        })
        .collect()
}

/// Benefit of moving each node of `bag_i` into `bag_j`.
pub fn relocation_benefit(bag_i: &[usize], bag_j: &[usize], m: &SimilarityMatrix) -> Vec<f64> {
    let local = local_cost(bag_i, m);
    relocation_from_local(&local, bag_i, bag_j, m)
}

/// Same as [`relocation_benefit`] with the `bag_i` local costs precomputed.
pub(crate) fn relocation_from_local(
    local_i: &[f64],
    bag_i: &[usize],
    bag_j: &[usize],
    m: &SimilarityMatrix,
) -> Vec<f64> {
    debug_assert_eq!(local_i.len(), bag_i.len());
    local_i
        .iter()
        .zip(cross_cost(bag_i, bag_j, m))
        .map(|(l, r)| l - r)
        .collect()
}

/// Row-major table of exchange benefits, one row per node of the first bag.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeMatrix {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f64>,
}

impl ExchangeMatrix {
    #[inline(always)]
    pub fn get(&self, p: usize, q: usize) -> f64 {
        self.values[p * self.cols + q]
    }

    /// Largest entry and its `(row, col)`; the first one in row-major order wins ties.
    pub fn argmax(&self) -> Option<(f64, usize, usize)> {
        let mut best: Option<(f64, usize)> = None;
        for (idx, &v) in self.values.iter().enumerate() {
            match best {
                Some((b, _)) if v <= b => {}
                _ => best = Some((v, idx)),
            }
        }
        best.map(|(v, idx)| (v, idx / self.cols, idx % self.cols))
    }
}

/// Benefit of swapping each `(p, q)` pair with `p` in `bag_i` and `q` in `bag_j`.
pub fn exchange_benefit(bag_i: &[usize], bag_j: &[usize], m: &SimilarityMatrix) -> ExchangeMatrix {
    let b_ij = relocation_benefit(bag_i, bag_j, m);
    let b_ji = relocation_benefit(bag_j, bag_i, m);
    exchange_from_relocation(bag_i, bag_j, &b_ij, &b_ji, m)
}

/// `2·M[p][q] + b_ij[p] + b_ji[q]` for every pair.
pub(crate) fn exchange_from_relocation(
    bag_i: &[usize],
    bag_j: &[usize],
    b_ij: &[f64],
    b_ji: &[f64],
    m: &SimilarityMatrix,
) -> ExchangeMatrix {
    let mut values = Vec::with_capacity(bag_i.len() * bag_j.len());
    for (&p, &bp) in bag_i.iter().zip(b_ij) {
        let row = m.row(p);
        for (&q, &bq) in bag_j.iter().zip(b_ji) {
            values.push(row[q] * 2.0 + bp + bq);
        }
    }
    ExchangeMatrix {
        rows: bag_i.len(),
        cols: bag_j.len(),
        values,
    }
}

/// Index and value of the largest entry; the first one wins ties.
pub(crate) fn argmax(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((idx, v)),
        }
    }
    best
}
