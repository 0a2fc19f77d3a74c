//! Error types shared by every module of the crate.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A vector handed to a neuron, layer, network or dataset has the wrong length.
    #[error("shape mismatch in {context}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("dataset is empty")]
    EmptyDataset,

    /// One side of the training/evaluation split has no samples.
    #[error("empty split: {training} training samples, {evaluation} evaluation samples")]
    EmptySplit { training: usize, evaluation: usize },

    #[error("invalid construction: {0}")]
    Construction(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mean and standard deviation no longer describe the stored samples.
    #[error("dataset mean/standard deviation are stale after incremental additions; refresh statistics first")]
    StaleStatistics,

    #[error("failed to parse dataset: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn shape(context: &'static str, expected: usize, actual: usize) -> Error {
        Error::ShapeMismatch { context, expected, actual }
    }
}

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn ensure_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::shape(context, expected, actual))
    }
}
