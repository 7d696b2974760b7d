use std::io;

/// Errors raised while generating, reading or writing a labelled corpus.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// A sample count below zero was requested
    #[error("Sample count must be non-negative, got {0}")]
    InvalidCount(i64),
    /// A label outside the three sentiment classes
    #[error("Unknown sentiment label: {0:?}")]
    UnknownLabel(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
