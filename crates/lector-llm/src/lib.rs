//! Lector LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `lector-domain`, plus helpers for
//! reading structured data out of oracle responses.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use lector_llm::MockProvider;
//! use lector_domain::traits::{CompletionRequest, LlmProvider};
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete(&CompletionRequest::new("be brief", "hi")).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod call;
pub mod openai;
pub mod response;

use lector_domain::traits::{CompletionRequest, LlmProvider as LlmProviderTrait};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use call::SerialOracle;
pub use openai::{OpenAiProvider, MAX_ATTEMPTS_LIMIT};
pub use response::{normalize_key, parse_json_object, value_to_text};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The caller's time budget for a call ran out
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Error reported by a provider implementation
    #[error("Provider error: {0}")]
    Provider(String),

    /// API key environment variable not set
    #[error("API key not found in environment variable '{0}'")]
    MissingApiKey(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Scripted
/// responses are keyed by a pattern: the first pattern contained in the request's
/// instructions or prompt wins. Every request is recorded.
///
/// # Examples
///
/// ```
/// use lector_llm::MockProvider;
/// use lector_domain::traits::{CompletionRequest, LlmProvider};
///
/// let mut provider = MockProvider::default();
/// provider.add_response("part 1/2", "first");
/// provider.add_error("part 2/2");
///
/// let first = CompletionRequest::new("Analyze part 1/2", "text");
/// let second = CompletionRequest::new("Analyze part 2/2", "text");
/// assert_eq!(provider.complete(&first).unwrap(), "first");
/// assert!(provider.complete(&second).is_err());
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, Scripted)>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    latency: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            latency: Duration::ZERO,
        }
    }

    /// Respond with `response` to requests containing `pattern`
    pub fn add_response(&mut self, pattern: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((pattern.into(), Scripted::Reply(response.into())));
    }

    /// Fail requests containing `pattern`
    pub fn add_error(&mut self, pattern: impl Into<String>) {
        lock(&self.responses).push((pattern.into(), Scripted::Fail));
    }

    /// Block for `latency` before answering each request
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let responses = lock(&self.responses);
        let scripted = responses.iter().find(|(pattern, _)| {
            request.instructions.contains(pattern.as_str()) || request.prompt.contains(pattern.as_str())
        });

        match scripted {
            Some((_, Scripted::Reply(response))) => Ok(response.clone()),
            Some((_, Scripted::Fail)) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest::new("instructions", prompt)
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&request("any prompt"));
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete(&request("say hello")).unwrap(), "world");
        assert_eq!(provider.complete(&request("foo!")).unwrap(), "bar");
        assert_eq!(
            provider.complete(&request("unknown")).unwrap(),
            "Default mock response"
        );
    }

    #[test]
    fn test_mock_provider_matches_instructions() {
        let mut provider = MockProvider::default();
        provider.add_response("instructions", "matched");
        assert_eq!(provider.complete(&request("x")).unwrap(), "matched");
    }

    #[test]
    fn test_mock_provider_records_requests() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);
        provider.complete(&request("prompt1")).unwrap();
        provider.complete(&request("prompt2")).unwrap();

        let prompts: Vec<_> = provider.requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(prompts, vec!["prompt1", "prompt2"]);
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.complete(&request("bad prompt"));
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&request("test")).unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
