use bagforge_core::io;
use bagforge_core::{BfResult, SimilarityMatrix};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct BuildMatrixArgs {
    /// Condensed pair scores (JSON array, or numbers separated by commas/whitespace)
    #[arg(long)]
    pub importance: PathBuf,

    #[arg(short = 'n', long, default_value_t = 144)]
    pub nodes: usize,

    #[arg(short, long, default_value = "outputs/sim_mtx.csv")]
    pub out: PathBuf,
}

pub fn run(args: BuildMatrixArgs) -> BfResult<()> {
    let values = io::load_condensed(&args.importance)?;
    let matrix = SimilarityMatrix::from_condensed(&values, args.nodes)?;
    io::save_matrix(&matrix, &args.out)?;

    info!("[OK] Saved {}x{} similarity matrix -> {}", args.nodes, args.nodes, args.out.display());
    Ok(())
}
