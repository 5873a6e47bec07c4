use crate::reports;
use bagforge_core::config::SearchParams;
use bagforge_core::io;
use bagforge_core::optimizer::{OptimizationOptions, Optimizer, ProgressCallback};
use bagforge_core::{BagForgeError, BfResult};
use clap::{ArgMatches, Args};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[command(flatten)]
    pub search: SearchParams,

    /// Similarity matrix CSV
    #[arg(long, default_value = "outputs/sim_mtx.csv")]
    pub sim: PathBuf,

    /// Expected node count; must match the matrix
    #[arg(short = 'n', long)]
    pub nodes: Option<usize>,

    /// JSON file with search parameters; explicit flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, default_value = "outputs/communities.json")]
    pub out: PathBuf,
}

struct CliLogger;
impl ProgressCallback for CliLogger {
    fn on_progress(&self, completed: usize, total: usize, best_cost: f64) -> bool {
        info!("[{}/{}] best_cost={:.6}", completed, total, best_cost);
        true
    }
}

pub fn run(args: DetectArgs, matches: Option<&ArgMatches>) -> BfResult<()> {
    let params = match &args.config {
        Some(path) => {
            info!("⚙️  Loading search parameters from: {}", path.display());
            let mut file_params = SearchParams::load_from_file(path)?;
            if let Some(m) = matches {
                file_params.merge_from_cli(&args.search, m);
            }
            file_params
        }
        None => args.search.clone(),
    };

    let matrix = io::load_matrix(&args.sim)?;
    let n = matrix.len();
    if let Some(expected) = args.nodes {
        if expected != n {
            return Err(BagForgeError::Config(format!(
                "--nodes is {} but the similarity matrix is {}x{}",
                expected, n, n
            )));
        }
    }
    params.validate(n)?;

    let options = OptimizationOptions::try_from(&params)?;
    let optimizer = Optimizer::new(Arc::new(matrix), options);
    let result = optimizer.run(CliLogger)?;

    let communities = result.communities()?;
    io::save_communities(&communities, &args.out)?;

    reports::print_partition_summary("BEST PARTITION", &communities, result.cost);
    info!(
        "Moves: {} ({} relocations, {} exchanges) over {} restarts in {:.2?}",
        result.stats.iterations,
        result.stats.relocations,
        result.stats.exchanges,
        result.restarts_completed,
        result.elapsed
    );
    info!("[OK] Best cost: {:.6}", result.cost);
    Ok(())
}
