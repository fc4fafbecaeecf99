//! Error Handling Module
//!
//! Defines custom error types for the FER evaluation harness.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for evaluation operations
#[derive(Error, Debug)]
pub enum FerEvalError {
    /// Error loading or parsing the dataset
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Error restoring a model checkpoint
    #[error("Checkpoint error at '{0}': {1}")]
    Checkpoint(PathBuf, String),

    /// Unknown architecture identifier
    #[error("Unknown architecture: '{0}'")]
    UnknownArch(String),

    /// A split contained no samples
    #[error("Cannot evaluate an empty split: {0}")]
    EmptySplit(String),

    /// Error extracting tensor data onto the host
    #[error("Tensor error: {0}")]
    Tensor(String),

    /// Error rendering a plot
    #[error("Render error: {0}")]
    Render(String),

    /// CSV parse error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Convenience Result type for evaluation operations
pub type Result<T> = std::result::Result<T, FerEvalError>;
