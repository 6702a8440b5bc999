//! Error type shared by every stage of the pipeline.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IrisError>;

/// Everything that can abort a training run.
///
/// None of these are recovered locally: the dataset is small, local and
/// deterministic, so a retry without fixing the input would fail the same way.
#[derive(Debug, Error)]
pub enum IrisError {
    /// A numeric field could not be parsed, or the file has no data rows.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A class label is not a member of the category list.
    #[error("label '{label}' is not one of {categories:?}")]
    Encoding { label: String, categories: Vec<String> },

    /// A feature vector has zero (or non-finite) L2 norm and cannot be normalized.
    #[error("feature vector at row {index} has zero length and cannot be normalized")]
    DegenerateVector { index: usize },

    /// Two sequences that must be index-aligned have different lengths.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The model service reported an internal fault.
    #[error("training failed: {0}")]
    Training(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
