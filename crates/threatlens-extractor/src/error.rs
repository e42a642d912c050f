//! Error types for the Extractor

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an extraction run
///
/// A failed completion call for a single chunk is not one of these: it is
/// recorded as a [`ChunkFailure`](crate::ChunkFailure) and the run goes on.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The input document could not be read
    #[error("Error reading the file {path}: {source}")]
    SourceRead {
        /// Path of the input document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input document is not a readable Word document
    #[error("Error reading the file {path}: {message}")]
    DocumentFormat {
        /// Path of the input document
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// The table could not be written
    #[error("Error saving data to {path}: {message}")]
    Persistence {
        /// Path of the output file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Document exceeds maximum length
    #[error("Document too long: {0} chars (max: {1})")]
    DocumentTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ExtractorError::Persistence {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
