//! Core Extractor implementation

use crate::assembler::TableAssembler;
use crate::chunking::TextChunker;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::persist::save_table;
use crate::prompt::PromptBuilder;
use crate::source::read_document;
use crate::types::{ChunkSummary, ExtractionMetadata, ExtractionReport};
use std::fmt::Display;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use threatlens_domain::{CompletionClient, Document, Tokenizer};
use tracing::{debug, info};

/// The Extractor turns log documents into incident tables
///
/// Chunks are sent one at a time, in document order. A failed completion
/// call only loses that chunk's records.
pub struct Extractor<C, T> {
    client: C,
    tokenizer: T,
    prompt: PromptBuilder,
    config: ExtractorConfig,
    model_name: String,
}

impl<C, T> Extractor<C, T>
where
    C: CompletionClient,
    C::Error: Display,
    T: Tokenizer,
{
    /// Create a new Extractor
    ///
    /// Fails when the configuration is invalid or the fixed prompt text
    /// leaves no room for log data.
    pub fn new(client: C, tokenizer: T, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;

        let extractor = Self {
            client,
            tokenizer,
            prompt: PromptBuilder::new(),
            config,
            model_name: "llm".to_string(),
        };
        if extractor.max_chunk_tokens() == 0 {
            return Err(ExtractorError::Config(format!(
                "prompt overhead of {} tokens leaves no room for log data within {} tokens",
                extractor.prompt.overhead_tokens(&extractor.tokenizer),
                extractor.config.prompt_budget()
            )));
        }
        Ok(extractor)
    }

    /// Create a new Extractor with a specific model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Token budget for the log text of one chunk
    ///
    /// Context limit minus the completion reservation minus the fixed
    /// system and task text.
    pub fn max_chunk_tokens(&self) -> usize {
        self.config
            .prompt_budget()
            .saturating_sub(self.prompt.overhead_tokens(&self.tokenizer))
    }

    /// Extract incident records from a document
    pub fn extract(
        &self,
        document: &Document,
        source_id: &str,
    ) -> Result<ExtractionReport, ExtractorError> {
        let chars = document.char_len();
        if chars > self.config.max_document_chars {
            return Err(ExtractorError::DocumentTooLong(
                chars,
                self.config.max_document_chars,
            ));
        }

        let start_time = Instant::now();
        let max_chunk_tokens = self.max_chunk_tokens();
        let chunks = TextChunker::new(&self.tokenizer, max_chunk_tokens).chunk(document);
        info!("Log data split into {} chunks.", chunks.len());

        let mut assembler = TableAssembler::new();
        let mut summaries = Vec::with_capacity(chunks.len());

        for chunk in &chunks {
            info!(
                "Processing chunk {}/{} with estimated tokens: {}",
                chunk.index() + 1,
                chunks.len(),
                chunk.token_count()
            );

            let prompt = self.prompt.build(&chunk.text());
            debug!("Prompt length: {} chars", prompt.len());

            let result = self.client.complete(&prompt);
            if let Ok(response) = &result {
                debug!("Response length: {} chars", response.len());
            }

            if let Some(rows) = assembler.push_result(chunk.index(), result) {
                summaries.push(ChunkSummary {
                    index: chunk.index(),
                    paragraphs: chunk.paragraphs().len(),
                    estimated_tokens: chunk.token_count(),
                    records: rows.records,
                    padded_rows: rows.padded,
                    truncated_rows: rows.truncated,
                });
            }
        }

        let (table, failures) = assembler.finish();

        let metadata = ExtractionMetadata {
            source_id: source_id.to_string(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::ZERO)
                .as_secs(),
            model_name: self.model_name.clone(),
            max_chunk_tokens,
            total_chunks: chunks.len(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Extraction complete: {} records from {} chunks, {} failed",
            table.len(),
            chunks.len(),
            failures.len()
        );

        Ok(ExtractionReport {
            table,
            chunks: summaries,
            failures,
            metadata,
        })
    }

    /// Read `input`, extract, and save the table to `output`
    pub fn extract_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<ExtractionReport, ExtractorError> {
        let input = input.as_ref();
        let document = read_document(input)?;
        info!("Log data extracted successfully from {}", input.display());

        let report = self.extract(&document, &input.display().to_string())?;
        save_table(&report.table, output)?;
        Ok(report)
    }
}
