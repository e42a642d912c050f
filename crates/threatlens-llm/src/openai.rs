//! OpenAI Chat Completions client
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint.
//!
//! # Features
//!
//! - Blocking HTTP, one request in flight at a time
//! - Configurable endpoint, model, token reservation and temperature
//! - Optional retry with exponential backoff (off by default)
//! - Timeouts surface as [`LlmError::Timeout`]
//!
//! # Examples
//!
//! ```no_run
//! use threatlens_llm::{CompletionConfig, OpenAiClient};
//!
//! let config = CompletionConfig::default().with_api_key_from_env();
//! let client = OpenAiClient::new(config).unwrap();
//! ```

use crate::config::CompletionConfig;
use crate::LlmError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use threatlens_domain::{CompletionClient, Prompt};
use tracing::{debug, warn};

/// Completion client for OpenAI-compatible chat APIs
pub struct OpenAiClient {
    config: CompletionConfig,
    api_key: String,
    client: Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the configuration is invalid
    /// - no API key is configured
    /// - the HTTP client cannot be built
    pub fn new(config: CompletionConfig) -> Result<Self, LlmError> {
        config.validate()?;

        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Model used for completions
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Full URL of the completions endpoint
    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    fn send_once(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(status_error(status, &text, &self.config.model));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_content(parsed)
    }
}

/// Map a non-success status to an error; only 429 and 5xx are retryable
fn status_error(status: StatusCode, body: &str, model: &str) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        s if s.is_client_error() => LlmError::InvalidRequest(format!("HTTP {}: {}", s, body)),
        s => LlmError::Communication(format!("HTTP {}: {}", s, body)),
    }
}

fn extract_content(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
}

/// Delay before retry `attempt` (1-based): 1s, 2s, 4s, ...
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt.saturating_sub(1)))
}

impl CompletionClient for OpenAiClient {
    type Error = LlmError;

    fn complete(&self, prompt: &Prompt) -> Result<String, Self::Error> {
        debug!(
            "Sending {} chars to {} (model {})",
            prompt.len(),
            self.url(),
            self.config.model
        );

        let mut attempt = 0;
        loop {
            match self.send_once(prompt) {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.config.max_retries && e.is_retryable() => {
                    attempt += 1;
                    let delay = backoff_delay(attempt);
                    warn!(
                        "Completion attempt {} failed: {}; retrying in {:?}",
                        attempt, e, delay
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CompletionConfig {
        CompletionConfig::default().with_api_key("test-key")
    }

    #[test]
    fn test_client_creation() {
        let client = OpenAiClient::new(config()).unwrap();
        assert_eq!(client.model(), "gpt-4");
        assert_eq!(client.url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_trailing_slash_in_endpoint() {
        let mut cfg = config();
        cfg.endpoint = "http://localhost:8000/v1/".to_string();
        let client = OpenAiClient::new(cfg).unwrap();
        assert_eq!(client.url(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_missing_api_key() {
        let result = OpenAiClient::new(CompletionConfig::default());
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[test]
    fn test_backoff_delay() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let unauthorized = status_error(StatusCode::UNAUTHORIZED, "bad key", "gpt-4");
        assert!(matches!(unauthorized, LlmError::InvalidRequest(_)));
        assert!(!unauthorized.is_retryable());

        let too_long = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"context_length_exceeded"}}"#,
            "gpt-4",
        );
        assert!(too_long.to_string().contains("context_length_exceeded"));
        assert!(!too_long.is_retryable());

        assert!(!status_error(StatusCode::NOT_FOUND, "", "gpt-4").is_retryable());
    }

    #[test]
    fn test_rate_limit_and_server_errors_are_retried() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "", "gpt-4"),
            LlmError::RateLimitExceeded
        ));
        let unavailable = status_error(StatusCode::SERVICE_UNAVAILABLE, "overloaded", "gpt-4");
        assert!(matches!(unavailable, LlmError::Communication(_)));
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn test_extract_content() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"a\tb"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_content(parsed).unwrap(), "a\tb");
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_content(parsed),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "persona",
                },
                ChatMessage {
                    role: "user",
                    content: "logs",
                },
            ],
            max_tokens: 800,
            temperature: 0.5,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "logs");
        assert_eq!(value["max_tokens"], 800);
    }

    #[test]
    fn test_unreachable_endpoint_is_communication_error() {
        let mut cfg = config();
        cfg.endpoint = "http://127.0.0.1:9".to_string();
        cfg.timeout_secs = 2;
        let client = OpenAiClient::new(cfg).unwrap();

        let result = client.complete(&Prompt::new("system", "user"));
        assert!(matches!(
            result,
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout)
        ));
    }
}
