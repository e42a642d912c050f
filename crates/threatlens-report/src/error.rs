//! Error types for the report stage

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a table or drawing charts
#[derive(Error, Debug)]
pub enum ReportError {
    /// The persisted table could not be read
    #[error("Error loading data from {path}: {message}")]
    Persistence {
        /// Path of the CSV file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// A chart needs a column the frame does not have
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// A chart has nothing to plot
    #[error("No data to plot for {0}")]
    EmptyData(String),

    /// The plotting backend failed
    #[error("Rendering error: {0}")]
    Render(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReportError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ReportError::Persistence {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
