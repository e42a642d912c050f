//! ThreatLens Completion Client Layer
//!
//! Implementations of the `CompletionClient` trait from `threatlens-domain`.
//!
//! # Clients
//!
//! - `MockClient`: Deterministic mock for testing
//! - `OpenAiClient`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use threatlens_domain::{CompletionClient, Prompt};
//! use threatlens_llm::MockClient;
//!
//! let client = MockClient::new("Hello from LLM!");
//! let result = client.complete(&Prompt::new("system", "user")).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod openai;

use std::sync::{Arc, Mutex};
use thiserror::Error;
use threatlens_domain::{CompletionClient, Prompt};

pub use config::CompletionConfig;
pub use openai::OpenAiClient;

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not finish within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Invalid or unusable response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service rejected the request (4xx other than 404 and 429)
    #[error("Request rejected: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API credential configured
    #[error("No API key configured (set {})", config::API_KEY_ENV)]
    MissingApiKey,

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::Timeout | LlmError::RateLimitExceeded
        )
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Response(String),
    Error(String),
}

/// Mock completion client for deterministic testing
///
/// Returns pre-configured responses without any network calls. A scripted
/// response is selected when the user message contains its key, which lets a
/// test target one chunk by a word that only appears in that chunk.
///
/// # Examples
///
/// ```
/// use threatlens_domain::{CompletionClient, Prompt};
/// use threatlens_llm::MockClient;
///
/// let mut client = MockClient::default();
/// client.add_response("alpha", "response1");
/// client.add_error("beta");
///
/// assert_eq!(client.complete(&Prompt::new("", "log alpha")).unwrap(), "response1");
/// assert!(client.complete(&Prompt::new("", "log beta")).is_err());
/// assert_eq!(client.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockClient {
    default_response: String,
    scripted: Arc<Mutex<Vec<(String, Scripted)>>>,
    prompts: Arc<Mutex<Vec<Prompt>>>,
}

impl MockClient {
    /// Create a MockClient with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            scripted: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond with `response` when the user message contains `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.lock_scripted()
            .push((key.into(), Scripted::Response(response.into())));
    }

    /// Fail when the user message contains `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        self.lock_scripted()
            .push((key.into(), Scripted::Error("Mock error".to_string())));
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Forget recorded prompts
    pub fn reset(&self) {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn lock_scripted(&self) -> std::sync::MutexGuard<'_, Vec<(String, Scripted)>> {
        self.scripted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionClient for MockClient {
    type Error = LlmError;

    fn complete(&self, prompt: &Prompt) -> Result<String, Self::Error> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.clone());

        let scripted = self.lock_scripted();
        match scripted.iter().find(|(key, _)| prompt.user.contains(key.as_str())) {
            Some((_, Scripted::Response(text))) => Ok(text.clone()),
            Some((_, Scripted::Error(message))) => Err(LlmError::Other(message.clone())),
            None => Ok(self.default_response.clone()),
        }
    }
}
