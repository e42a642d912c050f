//! Token counting
//!
//! [`BpeTokenizer`] counts the tokens the model will actually see. The
//! character and word tokenizers are cheap approximations; they under-count
//! dense log text such as hashes and addresses.

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use threatlens_domain::Tokenizer;
use tiktoken_rs::CoreBPE;
use tracing::debug;

/// Tokenizer selection in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// The model's BPE encoding, cl100k when the model is unknown
    #[default]
    Bpe,
    /// About four characters per token
    Chars,
    /// One token per whitespace-separated word
    Words,
}

impl TokenizerKind {
    /// Build the tokenizer this kind names for the given model
    pub fn build(&self, model: &str) -> Result<Box<dyn Tokenizer + Send + Sync>, ExtractorError> {
        Ok(match self {
            TokenizerKind::Bpe => Box::new(BpeTokenizer::for_model(model)?),
            TokenizerKind::Chars => Box::new(CharRatioTokenizer::default()),
            TokenizerKind::Words => Box::new(WhitespaceTokenizer),
        })
    }
}

/// Counts tokens with a byte-pair encoding
pub struct BpeTokenizer {
    bpe: CoreBPE,
}

impl BpeTokenizer {
    /// The cl100k_base encoding used by GPT-4 and GPT-3.5
    pub fn cl100k() -> Result<Self, ExtractorError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| ExtractorError::Config(format!("Failed to load BPE encoding: {}", e)))?;
        Ok(Self { bpe })
    }

    /// The encoding registered for `model`, falling back to cl100k
    pub fn for_model(model: &str) -> Result<Self, ExtractorError> {
        match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => Ok(Self { bpe }),
            Err(e) => {
                debug!("No BPE encoding for model {}: {}; using cl100k_base", model, e);
                Self::cl100k()
            }
        }
    }
}

impl fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BpeTokenizer").finish_non_exhaustive()
    }
}

impl Tokenizer for BpeTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Estimates tokens from the character count (rounded up)
#[derive(Debug, Clone, Copy)]
pub struct CharRatioTokenizer {
    chars_per_token: usize,
}

impl CharRatioTokenizer {
    /// Create a tokenizer with a custom ratio; a ratio of 0 is treated as 1
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for CharRatioTokenizer {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Tokenizer for CharRatioTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }
}

/// Counts whitespace-separated words
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}
