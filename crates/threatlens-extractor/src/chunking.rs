//! Token-bounded chunking of documents

use threatlens_domain::{Chunk, Document, Tokenizer};

/// Joins paragraphs inside a chunk, as in [`Chunk::text`]
const PARAGRAPH_SEPARATOR: &str = "\n";

/// Groups consecutive paragraphs into chunks under a token budget
///
/// Each paragraph is counted on its own and the counts are summed, together
/// with the newline that joins it to the previous paragraph. A paragraph
/// larger than the whole budget is never split; it becomes a chunk by itself.
pub struct TextChunker<T> {
    tokenizer: T,
    max_tokens: usize,
}

impl<T: Tokenizer> TextChunker<T> {
    /// Create a new text chunker
    pub fn new(tokenizer: T, max_tokens: usize) -> Self {
        Self {
            tokenizer,
            max_tokens,
        }
    }

    /// Token budget per chunk
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Chunk the given document
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_tokens = 0;
        let separator_tokens = self.tokenizer.count_tokens(PARAGRAPH_SEPARATOR);

        for paragraph in document.non_empty_paragraphs() {
            let paragraph_tokens = self.tokenizer.count_tokens(paragraph);

            if !current.is_empty()
                && current_tokens + separator_tokens + paragraph_tokens > self.max_tokens
            {
                chunks.push(Chunk::new(
                    chunks.len(),
                    std::mem::take(&mut current),
                    current_tokens,
                ));
                current_tokens = 0;
            }

            if !current.is_empty() {
                current_tokens += separator_tokens;
            }
            current.push(paragraph.to_string());
            current_tokens += paragraph_tokens;
        }

        if !current.is_empty() {
            chunks.push(Chunk::new(chunks.len(), current, current_tokens));
        }

        chunks
    }
}

/// Split `document` into chunks of at most `max_tokens` tokens
pub fn chunk_document<T: Tokenizer>(
    document: &Document,
    max_tokens: usize,
    tokenizer: T,
) -> Vec<Chunk> {
    TextChunker::new(tokenizer, max_tokens).chunk(document)
}
