use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand a condensed pair-score vector into a similarity matrix
    BuildMatrix(cmd::build_matrix::BuildMatrixArgs),
    /// Partition the nodes of a similarity matrix into bags
    Detect(cmd::detect::DetectArgs),
    /// Check a saved partition and report its cost
    Validate(cmd::validate::ValidateArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let sub_matches = matches.subcommand().map(|(_, m)| m);

    let result = match cli.command {
        Commands::BuildMatrix(args) => cmd::build_matrix::run(args),
        Commands::Detect(args) => cmd::detect::run(args, sub_matches),
        Commands::Validate(args) => cmd::validate::run(args),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
