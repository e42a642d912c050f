//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion client setup error
    #[error(transparent)]
    Llm(#[from] threatlens_llm::LlmError),

    /// Extraction error
    #[error(transparent)]
    Extractor(#[from] threatlens_extractor::ExtractorError),

    /// Report error
    #[error(transparent)]
    Report(#[from] threatlens_report::ReportError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
