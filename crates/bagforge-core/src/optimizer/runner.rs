use crate::config::{check_dimensions, SearchParams};
use crate::error::{BagForgeError, BfResult};
use crate::export::{self, Communities};
use crate::matrix::SimilarityMatrix;
use crate::optimizer::initialization;
use crate::optimizer::local_search::{LocalSearch, LocalSearchStats};
use crate::partition::Partition;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct OptimizationOptions {
    pub bags: usize,
    #[builder(default = 0)]
    pub restarts: usize,
    #[builder(default = 0)]
    pub seed: u64,
    /// 0 lets rayon pick the pool size.
    #[builder(default = 0)]
    pub threads: usize,
    #[builder(default = None)]
    pub max_time: Option<Duration>,
    /// Restarts run between two progress reports / stop checks.
    #[builder(default = 1)]
    pub batch_size: usize,
}

impl TryFrom<&SearchParams> for OptimizationOptions {
    type Error = BagForgeError;

    fn try_from(params: &SearchParams) -> BfResult<Self> {
        Ok(Self {
            bags: params.bags()?,
            restarts: params.restarts,
            seed: params.seed,
            threads: params.threads,
            max_time: params.max_time_secs.map(Duration::from_secs),
            batch_size: params.batch_size(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub partition: Partition,
    /// Dimension of the matrix the run searched over.
    pub nodes: usize,
    pub cost: f64,
    /// Randomized restarts actually run (the contiguous trial not included).
    pub restarts_completed: usize,
    /// Move counts summed over every trial; `initial_cost` is the contiguous
    /// start and `final_cost` the best cost found.
    pub stats: LocalSearchStats,
    pub elapsed: Duration,
}

impl OptimizationResult {
    pub fn communities(&self) -> BfResult<Communities> {
        export::export(&self.partition, self.nodes)
    }
}

pub trait ProgressCallback: Send + Sync {
    /// Called after each batch of restarts. Returning `false` stops the run.
    fn on_progress(&self, completed: usize, total: usize, best_cost: f64) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(usize, usize, f64) -> bool + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize, best_cost: f64) -> bool {
        self(completed, total, best_cost)
    }
}

pub struct Optimizer {
    matrix: Arc<SimilarityMatrix>,
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(matrix: Arc<SimilarityMatrix>, options: OptimizationOptions) -> Self {
        Self { matrix, options }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    /// Runs the contiguous trial, then `restarts` shuffled trials, and keeps
    /// the cheapest local optimum.
    ///
    /// Shuffles for a batch are drawn sequentially from one seeded stream
    /// before the batch is searched in parallel, and batch results are
    /// reduced in trial order, so the outcome does not depend on `threads`.
    pub fn run<CB: ProgressCallback>(&self, callback: CB) -> BfResult<OptimizationResult> {
        check_dimensions(self.matrix.len(), self.options.bags)?;
        let opts = &self.options;
        let n = self.matrix.len();
        let k = opts.bags;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads)
            .build()
            .map_err(|e| BagForgeError::Config(format!("Failed to build thread pool: {}", e)))?;

        let search = LocalSearch::new(&self.matrix);
        let start_time = Instant::now();

        info!(
            "Partitioning {} nodes into {} bags ({} restarts, seed {}, {} threads)",
            n,
            k,
            opts.restarts,
            opts.seed,
            pool.current_num_threads()
        );

        // 1. Contiguous trial
        let mut best = initialization::uniform(n, k);
        let first = search.descend(&mut best)?;
        let mut best_cost = first.final_cost;
        let mut totals = first;
        debug!(
            "Contiguous trial: {:.6} -> {:.6} in {} moves",
            first.initial_cost, first.final_cost, first.iterations
        );

        // 2. Shuffled restarts
        let mut rng = fastrand::Rng::with_seed(opts.seed);
        let batch_size = opts.batch_size.max(1);
        let mut completed = 0;

        while completed < opts.restarts {
            if let Some(limit) = opts.max_time {
                if start_time.elapsed() >= limit {
                    warn!(
                        "Time limit reached after {} of {} restarts",
                        completed, opts.restarts
                    );
                    break;
                }
            }

            let batch = batch_size.min(opts.restarts - completed);
            let starts: Vec<Partition> = (0..batch)
                .map(|_| initialization::shuffled(n, k, &mut rng))
                .collect();

            let outcomes: Vec<(Partition, LocalSearchStats)> = pool.install(|| {
                starts
                    .into_par_iter()
                    .map(|mut p| -> BfResult<(Partition, LocalSearchStats)> {
                        let stats = search.descend(&mut p)?;
                        Ok((p, stats))
                    })
                    .collect::<BfResult<Vec<_>>>()
            })?;

            for (offset, (partition, stats)) in outcomes.into_iter().enumerate() {
                totals.absorb(&stats);
                if stats.final_cost < best_cost {
                    debug!(
                        "Restart {} improved best cost {:.6} -> {:.6}",
                        completed + offset + 1,
                        best_cost,
                        stats.final_cost
                    );
                    best_cost = stats.final_cost;
                    best = partition;
                }
            }
            completed += batch;

            debug!("Batch done: {}/{} restarts", completed, opts.restarts);
            if !callback.on_progress(completed, opts.restarts, best_cost) {
                info!("Stopped by caller after {} restarts", completed);
                break;
            }
        }

        totals.final_cost = best_cost;
        let elapsed = start_time.elapsed();
        info!(
            "Best cost {:.6} after {} restarts and {} moves ({:.2?})",
            best_cost, completed, totals.iterations, elapsed
        );

        Ok(OptimizationResult {
            partition: best,
            nodes: n,
            cost: best_cost,
            restarts_completed: completed,
            stats: totals,
            elapsed,
        })
    }
}
