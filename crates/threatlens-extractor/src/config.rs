//! Configuration for the Extractor

use crate::error::ExtractorError;
use crate::tokenizer::TokenizerKind;
use serde::{Deserialize, Serialize};

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Hard context limit of the model (prompt plus completion, tokens)
    pub context_limit: usize,

    /// Tokens reserved for the completion
    pub completion_reserve: usize,

    /// Tokenizer used to size chunks
    pub tokenizer: TokenizerKind,

    /// Maximum input document length (characters)
    pub max_document_chars: usize,
}

impl ExtractorConfig {
    /// Tokens left for prompt text once the completion is reserved
    pub fn prompt_budget(&self) -> usize {
        self.context_limit.saturating_sub(self.completion_reserve)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.context_limit == 0 {
            return Err(ExtractorError::Config(
                "context_limit must be greater than 0".to_string(),
            ));
        }
        if self.completion_reserve >= self.context_limit {
            return Err(ExtractorError::Config(format!(
                "completion_reserve ({}) must be smaller than context_limit ({})",
                self.completion_reserve, self.context_limit
            )));
        }
        if self.max_document_chars == 0 {
            return Err(ExtractorError::Config(
                "max_document_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for ExtractorConfig {
    /// GPT-4 sized defaults: 8192-token context, 800 reserved for the answer
    fn default() -> Self {
        Self {
            context_limit: 8192,
            completion_reserve: 800,
            tokenizer: TokenizerKind::Bpe,
            max_document_chars: 5_000_000,
        }
    }
}
