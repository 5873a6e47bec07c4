use crate::error::{BagForgeError, BfResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Number of bags (K); required before a run
    #[arg(long = "nclusters", short = 'K')]
    pub bags: Option<usize>,
    /// Randomized restarts after the contiguous trial (R)
    #[arg(long, default_value_t = 2000)]
    pub restarts: usize,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Worker threads for parallel restarts (0 = all cores)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
    /// Stop starting new restarts after this many seconds
    #[arg(long)]
    pub max_time_secs: Option<u64>,
    /// Restarts per progress report (defaults to a tenth of the run)
    #[arg(long)]
    pub report_every: Option<usize>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            bags: None,
            restarts: 2000,
            seed: 0,
            threads: 0,
            max_time_secs: None,
            report_every: None,
        }
    }
}

impl SearchParams {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overrides fields the user typed on the command line; file values win
    /// over clap defaults.
    pub fn merge_from_cli(&mut self, cli: &SearchParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(bags, "bags");
        update_if_present!(restarts, "restarts");
        update_if_present!(seed, "seed");
        update_if_present!(threads, "threads");
        update_if_present!(max_time_secs, "max_time_secs");
        update_if_present!(report_every, "report_every");
    }

    /// Restarts per progress batch; never zero.
    pub fn batch_size(&self) -> usize {
        self.report_every
            .unwrap_or(self.restarts / 10)
            .max(1)
    }

    pub fn bags(&self) -> BfResult<usize> {
        self.bags.ok_or_else(|| {
            BagForgeError::Config(
                "Number of bags is required (--nclusters or \"bags\" in the config file)"
                    .to_string(),
            )
        })
    }

    pub fn validate(&self, nodes: usize) -> BfResult<()> {
        check_dimensions(nodes, self.bags()?)
    }
}

/// Rejects an empty matrix and bag counts outside `1..=nodes`.
pub fn check_dimensions(nodes: usize, bags: usize) -> BfResult<()> {
    if nodes == 0 {
        return Err(BagForgeError::Config(
            "Similarity matrix has no nodes".to_string(),
        ));
    }
    if bags == 0 {
        return Err(BagForgeError::Config(
            "Number of bags must be at least 1".to_string(),
        ));
    }
    if bags > nodes {
        return Err(BagForgeError::Config(format!(
            "Number of bags ({}) exceeds number of nodes ({})",
            bags, nodes
        )));
    }
    Ok(())
}
