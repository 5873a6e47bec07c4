use thiserror::Error;

#[derive(Error, Debug)]
pub enum BagForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input Parse Error: {0}")]
    Parse(String),

    #[error("Condensed vector too short for {nodes} nodes: need {needed}, got {got}")]
    LengthMismatch {
        needed: usize,
        got: usize,
        nodes: usize,
    },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error(
        "Internal Consistency Error: accepted move at iteration {iteration} took cost from \
         {before} to {after} (benefit threshold {tolerance:e})"
    )]
    InternalConsistency {
        before: f64,
        after: f64,
        tolerance: f64,
        iteration: usize,
    },

    #[error("Partition Validation Error: {0}")]
    Validation(String),
}

pub type BfResult<T> = Result<T, BagForgeError>;
