//! Configuration for chart generation

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the report stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory the chart files are written to
    pub output_dir: PathBuf,

    /// Chart width in pixels
    pub chart_width: u32,

    /// Chart height in pixels
    pub chart_height: u32,
}

impl ReportConfig {
    /// Chart size as `(width, height)`
    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_height)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ReportError> {
        // Axis labels and captions need some room
        if self.chart_width < 200 || self.chart_height < 200 {
            return Err(ReportError::Config(format!(
                "chart size {}x{} is too small (min 200x200)",
                self.chart_width, self.chart_height
            )));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ReportError> {
        toml::from_str(toml_str)
            .map_err(|e| ReportError::Config(format!("Failed to parse TOML: {}", e)))
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            chart_width: 1000,
            chart_height: 600,
        }
    }
}
