//! Error types for trial-stats
//!
//! Aggregation itself never fails; these errors come from ingesting JSON and
//! reading or writing result files.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// trial-stats error types
#[derive(Error, Debug)]
pub enum Error {
    /// A result file was readable JSON but not a result file
    #[error("Invalid result file {}: {reason}\nExpected a JSON object with a \"parameters\" object and metric entries", path.display())]
    InvalidResultFile {
        /// File that failed to load
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Input had the wrong shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse or encode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
