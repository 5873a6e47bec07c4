pub mod initialization;
pub mod local_search;
pub mod runner;

// Re-export specific structs for easier access
pub use self::local_search::{certify, LocalSearch, LocalSearchStats, Move};
pub use self::runner::{OptimizationOptions, OptimizationResult, Optimizer, ProgressCallback};
