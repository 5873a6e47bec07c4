//! Steepest-improvement descent over relocations and exchanges.
//!
//! Every iteration rebuilds all benefit tables from scratch (O(N²) work per
//! iteration) and applies the single best move. Relocations take priority:
//! an exchange is applied only when no relocation is improving. A move is
//! improving when its benefit exceeds [`COST_TOLERANCE`], and every applied
//! move must strictly lower the total cost.

use crate::cost::{self, ExchangeMatrix};
use crate::error::{BagForgeError, BfResult};
use crate::matrix::SimilarityMatrix;
use crate::partition::Partition;
use itertools::Itertools;
use tracing::trace;

/// Smallest benefit that counts as an improving move.
pub const COST_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Move {
    /// Node at `pos` in bag `from` moves to the end of bag `to`.
    Relocate {
        from: usize,
        to: usize,
        pos: usize,
        benefit: f64,
    },
    /// Node at `pos_i` in bag `i` trades places with node at `pos_j` in bag `j` (`i < j`).
    Exchange {
        i: usize,
        j: usize,
        pos_i: usize,
        pos_j: usize,
        benefit: f64,
    },
}

impl Move {
    pub fn benefit(&self) -> f64 {
        match *self {
            Move::Relocate { benefit, .. } | Move::Exchange { benefit, .. } => benefit,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalSearchStats {
    pub initial_cost: f64,
    pub final_cost: f64,
    pub iterations: usize,
    pub relocations: usize,
    pub exchanges: usize,
}

impl LocalSearchStats {
    /// Accumulates move counts of another descent; costs are left untouched.
    pub fn absorb(&mut self, other: &LocalSearchStats) {
        self.iterations += other.iterations;
        self.relocations += other.relocations;
        self.exchanges += other.exchanges;
    }
}

enum Phase {
    Scanning,
    Improving(Move),
    Converged,
}

/// Benefit tables for one partition snapshot.
struct BenefitTables {
    k: usize,
    // [i * k + j]: relocation benefits of bag i's nodes towards bag j (empty when i == j)
    relocation: Vec<Vec<f64>>,
    // [i * k + j] for i < j
    exchange: Vec<Option<ExchangeMatrix>>,
}

impl BenefitTables {
    fn build(partition: &Partition, m: &SimilarityMatrix) -> Self {
        let k = partition.num_bags();
        let local: Vec<Vec<f64>> = partition
            .bags()
            .iter()
            .map(|bag| cost::local_cost(bag, m))
            .collect();

        let mut relocation = vec![Vec::new(); k * k];
        for i in 0..k {
            for j in 0..k {
                if i != j {
                    relocation[i * k + j] = cost::relocation_from_local(
                        &local[i],
                        partition.bag(i),
                        partition.bag(j),
                        m,
                    );
                }
            }
        }

        let mut exchange = vec![None; k * k];
        for (i, j) in (0..k).tuple_combinations() {
            exchange[i * k + j] = Some(cost::exchange_from_relocation(
                partition.bag(i),
                partition.bag(j),
                &relocation[i * k + j],
                &relocation[j * k + i],
                m,
            ));
        }

        Self {
            k,
            relocation,
            exchange,
        }
    }

    /// Largest relocation benefit over ordered bag pairs, first found on ties.
    fn best_relocation(&self) -> Option<Move> {
        let k = self.k;
        let mut best: Option<Move> = None;
        for i in 0..k {
            for j in 0..k {
                if i == j {
                    continue;
                }
                if let Some((pos, benefit)) = cost::argmax(&self.relocation[i * k + j]) {
                    if best.map_or(true, |b| benefit > b.benefit()) {
                        best = Some(Move::Relocate {
                            from: i,
                            to: j,
                            pos,
                            benefit,
                        });
                    }
                }
            }
        }
        best
    }

    /// Largest exchange benefit over unordered bag pairs, first found on ties.
    fn best_exchange(&self) -> Option<Move> {
        let k = self.k;
        let mut best: Option<Move> = None;
        for (i, j) in (0..k).tuple_combinations() {
            let found = self.exchange[i * k + j]
                .as_ref()
                .and_then(ExchangeMatrix::argmax);
            if let Some((benefit, pos_i, pos_j)) = found {
                if best.map_or(true, |b| benefit > b.benefit()) {
                    best = Some(Move::Exchange {
                        i,
                        j,
                        pos_i,
                        pos_j,
                        benefit,
                    });
                }
            }
        }
        best
    }
}

pub struct LocalSearch<'a> {
    matrix: &'a SimilarityMatrix,
}

impl<'a> LocalSearch<'a> {
    pub fn new(matrix: &'a SimilarityMatrix) -> Self {
        Self { matrix }
    }

    /// The move the next iteration would apply, or `None` at a local optimum.
    pub fn best_move(&self, partition: &Partition) -> Option<Move> {
        let tables = BenefitTables::build(partition, self.matrix);
        let relocation = tables
            .best_relocation()
            .filter(|mv| mv.benefit() > COST_TOLERANCE);
        let exchange = tables
            .best_exchange()
            .filter(|mv| mv.benefit() > COST_TOLERANCE);
        relocation.or(exchange)
    }

    /// Descends from `partition` in place until no move is improving.
    ///
    /// Fails with `InternalConsistency` if an accepted move does not lower the
    /// total cost; a non-zero diagonal can inflate benefits that way.
    pub fn descend(&self, partition: &mut Partition) -> BfResult<LocalSearchStats> {
        let mut current = cost::total_cost(partition, self.matrix);
        let mut stats = LocalSearchStats {
            initial_cost: current,
            ..Default::default()
        };

        let mut phase = Phase::Scanning;
        loop {
            phase = match phase {
                Phase::Scanning => match self.best_move(partition) {
                    Some(mv) => Phase::Improving(mv),
                    None => Phase::Converged,
                },
                Phase::Improving(mv) => {
                    match mv {
                        Move::Relocate { from, to, pos, .. } => {
                            partition.relocate(from, to, pos);
                            stats.relocations += 1;
                        }
                        Move::Exchange {
                            i, j, pos_i, pos_j, ..
                        } => {
                            partition.exchange(i, j, pos_i, pos_j);
                            stats.exchanges += 1;
                        }
                    }
                    stats.iterations += 1;

                    let after = cost::total_cost(partition, self.matrix);
                    trace!(
                        "iter {} {} benefit={:.6e} cost {:.6} -> {:.6}",
                        stats.iterations,
                        mv,
                        mv.benefit(),
                        current,
                        after
                    );
                    if after >= current {
                        return Err(BagForgeError::InternalConsistency {
                            before: current,
                            after,
                            tolerance: COST_TOLERANCE,
                            iteration: stats.iterations,
                        });
                    }
                    current = after;
                    Phase::Scanning
                }
                Phase::Converged => break,
            };
        }

        stats.final_cost = current;
        Ok(stats)
    }
}

/// True when no relocation or exchange benefit exceeds [`COST_TOLERANCE`].
pub fn certify(partition: &Partition, m: &SimilarityMatrix) -> bool {
    LocalSearch::new(m).best_move(partition).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::initialization;

    fn two_blocks() -> SimilarityMatrix {
        // Dissimilarity scores: members of {0,1} and {2,3} are close (low cost).
        SimilarityMatrix::from_condensed(&[0.01, 5.0, 5.0, 5.0, 5.0, 0.01], 4).unwrap()
    }

    #[test]
    fn test_descent_separates_blocks() {
        let m = two_blocks();
        let mut p = Partition::from_bags(vec![vec![0, 2], vec![1, 3]]);
        let stats = LocalSearch::new(&m).descend(&mut p).unwrap();

        let mut bags: Vec<Vec<usize>> = p
            .bags()
            .iter()
            .map(|b| b.iter().copied().sorted().collect())
            .collect();
        bags.sort();
        assert_eq!(bags, vec![vec![0, 1], vec![2, 3]]);
        assert!(stats.final_cost < stats.initial_cost);
        assert!(certify(&p, &m));
    }

    #[test]
    fn test_relocation_preferred_over_exchange() {
        // Nodes 0 and 2 repel each other; node 1 is neutral to both.
        let m = SimilarityMatrix::from_condensed(&[0.0, 10.0, 0.0], 3).unwrap();
        let p = Partition::from_bags(vec![vec![0, 2], vec![1]]);
        let mv = LocalSearch::new(&m).best_move(&p).unwrap();
        assert!(matches!(mv, Move::Relocate { from: 0, to: 1, .. }));
        assert_eq!(mv.benefit(), 10.0);
    }

    #[test]
    fn test_zero_matrix_converges_immediately() {
        let m = SimilarityMatrix::from_condensed(&vec![0.0; 15], 6).unwrap();
        let mut p = initialization::uniform(6, 3);
        let before = p.clone();
        let stats = LocalSearch::new(&m).descend(&mut p).unwrap();
        assert_eq!(stats.iterations, 0);
        assert_eq!(p, before);
        assert_eq!(stats.final_cost, 0.0);
    }

    #[test]
    fn test_single_bag_has_no_moves() {
        let m = two_blocks();
        let mut p = initialization::uniform(4, 1);
        let stats = LocalSearch::new(&m).descend(&mut p).unwrap();
        assert_eq!(stats.iterations, 0);
    }

    #[test]
    fn test_positive_diagonal_breaks_benefit_accounting() {
        // A self-score inflates the relocation benefit by exactly M[p][p].
        let m = SimilarityMatrix::from_rows(vec![
            vec![10.0, 1.0, 5.0],
            vec![1.0, 0.0, 3.0],
            vec![5.0, 3.0, 0.0],
        ])
        .unwrap();
        let mut p = Partition::from_bags(vec![vec![0, 1], vec![2]]);
        let err = LocalSearch::new(&m).descend(&mut p).unwrap_err();
        assert!(matches!(err, BagForgeError::InternalConsistency { .. }));
    }

    #[test]
    fn test_unit_diagonal_stalls_instead_of_cycling() {
        // Relocating any node has benefit 1, but the total stays at the trace.
        let identity = (0..4)
            .map(|i| (0..4).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        let m = SimilarityMatrix::from_rows(identity).unwrap();
        let mut p = Partition::from_bags(vec![vec![0, 1], vec![2, 3]]);

        let err = LocalSearch::new(&m).descend(&mut p).unwrap_err();
        match err {
            BagForgeError::InternalConsistency {
                before,
                after,
                iteration,
                ..
            } => {
                assert_eq!(before, 4.0);
                assert_eq!(after, 4.0);
                assert_eq!(iteration, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_relocation_tie_keeps_first_bag_pair() {
        // Node 1 (bag 0 -> 1) and node 2 (bag 1 -> 0) both gain 5.
        let m = SimilarityMatrix::from_rows(vec![
            vec![0.0, 3.0, 0.0, 0.0],
            vec![3.0, 0.0, -2.0, 0.0],
            vec![0.0, -2.0, 0.0, 3.0],
            vec![0.0, 0.0, 3.0, 0.0],
        ])
        .unwrap();
        let p = Partition::from_bags(vec![vec![0, 1], vec![2, 3]]);

        let mv = LocalSearch::new(&m).best_move(&p).unwrap();
        assert_eq!(
            mv,
            Move::Relocate {
                from: 0,
                to: 1,
                pos: 1,
                benefit: 5.0
            }
        );
    }

    #[test]
    fn test_exchange_tie_keeps_first_bag_pair() {
        // No relocation improves; bag pairs (0, 1) and (1, 2) both peak at 2.
        let m = SimilarityMatrix::from_condensed(
            &[
                -3.0, 3.0, -2.0, -1.0, -1.0, -3.0, 3.0, 2.0, 2.0, 0.0, -3.0, 3.0, 1.0, -1.0, -2.0,
            ],
            6,
        )
        .unwrap();
        let p = Partition::from_bags(vec![vec![0, 1], vec![2, 3], vec![4, 5]]);

        assert_eq!(
            cost::exchange_benefit(p.bag(1), p.bag(2), &m).argmax(),
            Some((2.0, 0, 1))
        );
        let mv = LocalSearch::new(&m).best_move(&p).unwrap();
        assert_eq!(
            mv,
            Move::Exchange {
                i: 0,
                j: 1,
                pos_i: 0,
                pos_j: 0,
                benefit: 2.0
            }
        );
    }

    #[test]
    fn test_move_display() {
        let mv = Move::Exchange {
            i: 0,
            j: 1,
            pos_i: 0,
            pos_j: 0,
            benefit: 1.0,
        };
        assert_eq!(mv.to_string(), "exchange");
    }
}
