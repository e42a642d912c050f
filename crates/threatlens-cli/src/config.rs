//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use threatlens_extractor::ExtractorConfig;
use threatlens_llm::CompletionConfig;
use threatlens_report::ReportConfig;

/// CLI configuration, one section per pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chunking and extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Completion service settings
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Chart settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Default file locations
    #[serde(default)]
    pub paths: Paths,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Default file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    /// Where `extract` writes and `visualize` reads the table
    #[serde(default = "default_table")]
    pub table: PathBuf,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Rows shown in the data overview
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".threatlens").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and validate a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section, and that the completion fits its reservation.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate()?;
        self.completion.validate()?;
        self.report.validate()?;
        if self.completion.max_tokens > self.extractor.completion_reserve {
            return Err(CliError::Config(format!(
                "completion.max_tokens ({}) exceeds extractor.completion_reserve ({})",
                self.completion.max_tokens, self.extractor.completion_reserve
            )));
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            table: default_table(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_table() -> PathBuf {
    PathBuf::from("output.csv")
}

fn default_true() -> bool {
    true
}

fn default_preview_rows() -> usize {
    5
}
