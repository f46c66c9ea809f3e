use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

/// Conditions that stop a load or a report outright.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("data directory not found: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("no dated folders found inside {}", .0.display())]
    NoPartitions(PathBuf),

    #[error("no valid CSV files found in any dated folder of {}", .0.display())]
    NoCsvFiles(PathBuf),

    #[error("missing `{0}` column")]
    MissingColumn(String),

    #[error("unknown date: {0}")]
    UnknownDate(String),

    #[error("invalid include pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path} line {line}: expected {expected} fields, found {found}")]
    ExtraFields {
        path: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),
}
