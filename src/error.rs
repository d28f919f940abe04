//! Error types for demostat

use thiserror::Error;

/// Main error type for demostat operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("List must contain nine numbers.")]
    InvalidInputSize { len: usize },

    #[error("Sum overflows the element type")]
    SumOverflow,

    #[error("Dataset has no complete rows")]
    EmptyDataset,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for demostat operations
pub type Result<T> = std::result::Result<T, Error>;
