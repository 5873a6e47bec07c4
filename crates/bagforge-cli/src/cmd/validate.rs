use crate::reports;
use bagforge_core::cost::total_cost;
use bagforge_core::io;
use bagforge_core::optimizer::certify;
use bagforge_core::BfResult;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, default_value = "outputs/sim_mtx.csv")]
    pub sim: PathBuf,

    #[arg(short, long, default_value = "outputs/communities.json")]
    pub partition: PathBuf,
}

pub fn run(args: ValidateArgs) -> BfResult<()> {
    let matrix = io::load_matrix(&args.sim)?;
    let communities = io::load_communities(&args.partition)?;

    let partition = communities.to_partition()?;
    partition.check(matrix.len())?;

    let cost = total_cost(&partition, &matrix);
    reports::print_partition_summary("AUDIT", &communities, cost);

    if certify(&partition, &matrix) {
        info!("[OK] Local optimum: no relocation or exchange improves cost {:.6}", cost);
    } else {
        warn!("Not a local optimum: an improving move exists (cost {:.6})", cost);
    }
    Ok(())
}
