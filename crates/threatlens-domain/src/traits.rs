//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! collaborators. Implementations live in other crates.

/// Trait for counting tokens in a piece of text
///
/// Implemented by the extractor's tokenizers. Implementations must be
/// deterministic: the same text always yields the same count.
pub trait Tokenizer {
    /// Number of tokens in `text`
    fn count_tokens(&self, text: &str) -> usize;
}

/// A two-part prompt: fixed system role plus the user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// System instruction (persona framing)
    pub system: String,

    /// Task template followed by the chunk text
    pub user: String,
}

impl Prompt {
    /// Create a prompt
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Total length in characters of both parts
    pub fn len(&self) -> usize {
        self.system.len() + self.user.len()
    }

    /// True when both parts are empty
    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.user.is_empty()
    }
}

/// Trait for text completion services
///
/// Implemented by the infrastructure layer (threatlens-llm)
pub trait CompletionClient {
    /// Error type for completion calls
    type Error;

    /// Send the prompt and return the raw completion text
    fn complete(&self, prompt: &Prompt) -> Result<String, Self::Error>;
}

impl<C: CompletionClient + ?Sized> CompletionClient for &C {
    type Error = C::Error;

    fn complete(&self, prompt: &Prompt) -> Result<String, Self::Error> {
        (**self).complete(prompt)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}
