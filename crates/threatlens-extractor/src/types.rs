//! Result types for extraction runs

use threatlens_domain::Table;

/// A chunk whose completion call failed and was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// Chunk index, starting at 0
    pub index: usize,

    /// Error reported by the completion client
    pub reason: String,
}

/// What happened to one successfully processed chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Chunk index, starting at 0
    pub index: usize,

    /// Paragraphs in the chunk
    pub paragraphs: usize,

    /// Estimated tokens of the chunk text
    pub estimated_tokens: usize,

    /// Records appended to the table
    pub records: usize,

    /// Rows padded to the schema width
    pub padded_rows: usize,

    /// Rows truncated to the schema width
    pub truncated_rows: usize,
}

/// Metadata about an extraction run
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Source identifier (usually the input path)
    pub source_id: String,

    /// Unix timestamp (seconds) when the run finished
    pub timestamp: u64,

    /// Name of the model used
    pub model_name: String,

    /// Token budget per chunk
    pub max_chunk_tokens: usize,

    /// Number of chunks the document was split into
    pub total_chunks: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Result of an extraction run
///
/// Always carries the records gathered from the chunks that succeeded.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Merged records in chunk order
    pub table: Table,

    /// Chunks that produced a response
    pub chunks: Vec<ChunkSummary>,

    /// Chunks that were skipped
    pub failures: Vec<ChunkFailure>,

    /// Metadata about the run
    pub metadata: ExtractionMetadata,
}

impl ExtractionReport {
    /// True when every chunk produced a response
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
