//! ThreatLens Extractor
//!
//! Turns unstructured log text into a table of security incidents using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Document → TextChunker → PromptBuilder → CompletionClient → TableAssembler → CSV
//! ```
//!
//! # Key Features
//!
//! - **Token-bounded chunking**: paragraphs grouped under the model's context budget
//! - **Sequential calls**: one chunk at a time, in document order
//! - **Partial failure tolerance**: a failed chunk is skipped, everything else is kept
//! - **Schema reconciliation**: every row is forced to the six incident fields
//!
//! # Example Usage
//!
//! ```no_run
//! use threatlens_extractor::{BpeTokenizer, Extractor, ExtractorConfig};
//! use threatlens_llm::MockClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockClient::new("Threat Type\tSeverity Level\nPhishing\tHigh");
//! let extractor = Extractor::new(llm, BpeTokenizer::cl100k()?, ExtractorConfig::default())?;
//!
//! let report = extractor.extract_file("logs.txt", "output.csv")?;
//! println!("Records: {}", report.table.len());
//! println!("Failed chunks: {}", report.failures.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod tokenizer;
mod prompt;
mod chunking;
mod parser;
mod assembler;
mod source;
mod persist;
mod extractor;


pub use error::ExtractorError;
pub use config::ExtractorConfig;
pub use types::{ChunkFailure, ChunkSummary, ExtractionMetadata, ExtractionReport};
pub use tokenizer::{BpeTokenizer, CharRatioTokenizer, TokenizerKind, WhitespaceTokenizer};
pub use prompt::{PromptBuilder, SYSTEM_INSTRUCTION};
pub use chunking::{chunk_document, TextChunker};
pub use parser::parse_rows;
pub use assembler::{assemble, ChunkRows, HeaderState, TableAssembler};
pub use source::read_document;
pub use persist::{save_table, write_table};
pub use extractor::Extractor;
