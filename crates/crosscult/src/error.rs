//! Error types for the crosscult library.

use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crosscult operations.
#[derive(Debug, Error)]
pub enum CrosscultError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory holds no `*.json` files.
    #[error("No .json files found in '{dir}'")]
    NoInput { dir: PathBuf },

    /// Every input file was skipped, so there is nothing to report on.
    #[error("No usable data: all input files were skipped")]
    NoUsableData,

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error drawing or encoding a figure.
    #[error("Figure error: {0}")]
    Figure(String),

    /// An optional output capability is not compiled in.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrosscultError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrosscultError::Io {
            path: path.into(),
            source,
        }
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for CrosscultError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        CrosscultError::Figure(err.to_string())
    }
}

/// Result type alias for crosscult operations.
pub type Result<T> = std::result::Result<T, CrosscultError>;
