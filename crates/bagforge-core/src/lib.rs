pub mod config;
pub mod cost;
pub mod error;
pub mod export;
pub mod io;
pub mod matrix;
pub mod optimizer;
pub mod partition;

pub use self::error::{BagForgeError, BfResult};
pub use self::export::Communities;
pub use self::matrix::SimilarityMatrix;
pub use self::partition::Partition;
