//! Document and chunk types

/// Source text split into paragraphs
///
/// Paragraphs keep their original order. A document is never modified after
/// it has been read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    paragraphs: Vec<String>,
}

impl Document {
    /// Build a document from raw text.
    ///
    /// Every line is a paragraph; lines are trimmed and blank lines dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use threatlens_domain::Document;
    ///
    /// let doc = Document::from_text("  first\n\n second \n");
    /// assert_eq!(doc.paragraphs(), ["first", "second"]);
    /// ```
    pub fn from_text(text: &str) -> Self {
        Self {
            paragraphs: text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Build a document from already separated paragraphs, kept as-is
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paragraphs: paragraphs.into_iter().map(Into::into).collect(),
        }
    }

    /// Paragraphs in document order
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Paragraphs that contain something other than whitespace
    pub fn non_empty_paragraphs(&self) -> impl Iterator<Item = &str> {
        self.paragraphs
            .iter()
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }

    /// Number of paragraphs
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// True when the document has no paragraphs
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Total characters across all paragraphs
    pub fn char_len(&self) -> usize {
        self.paragraphs.iter().map(|p| p.chars().count()).sum()
    }
}

/// A contiguous run of paragraphs sent as one completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    index: usize,
    paragraphs: Vec<String>,
    token_count: usize,
}

impl Chunk {
    /// Create a chunk
    pub fn new(index: usize, paragraphs: Vec<String>, token_count: usize) -> Self {
        Self {
            index,
            paragraphs,
            token_count,
        }
    }

    /// Position of the chunk in the document, starting at 0
    pub fn index(&self) -> usize {
        self.index
    }

    /// Paragraphs in this chunk
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Sum of the per-paragraph token counts
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Chunk text, paragraphs joined by newlines
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}
