//! OpenAI-compatible Provider Implementation
//!
//! Talks to any endpoint implementing the `/chat/completions` API (OpenAI, Azure
//! deployments behind a compatible gateway, Ollama, vLLM, LM Studio).
//!
//! # Features
//!
//! - Instructions sent as the system message, prompt as the user message
//! - Configurable endpoint, model and request timeout
//! - Retry logic with exponential backoff on transport errors and rate limits
//!
//! # Examples
//!
//! ```no_run
//! use lector_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env(
//!     "https://api.openai.com/v1",
//!     "gpt-4-turbo",
//!     "OPENAI_API_KEY",
//! ).unwrap();
//! ```

use crate::LlmError;
use lector_domain::traits::{CompletionRequest, LlmProvider as LlmProviderTrait};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout for a single HTTP request (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per completion
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Upper bound on attempts per completion
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Longest wait between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// OpenAI-compatible chat-completions provider
pub struct OpenAiProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_attempts: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: API base (e.g., "https://api.openai.com/v1")
    /// - `model`: Model to use (e.g., "gpt-4-turbo")
    /// - `api_key`: Bearer token
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Create a provider reading the API key from an environment variable.
    ///
    /// Local endpoints (localhost, 127.0.0.1) do not need a key.
    pub fn from_env(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key_env: &str,
    ) -> Result<Self, LlmError> {
        let base_url = base_url.into();
        let is_local = base_url.contains("localhost") || base_url.contains("127.0.0.1");

        let api_key = match std::env::var(api_key_env) {
            Ok(key) => key,
            Err(_) if is_local => {
                debug!("No API key set for local endpoint; using placeholder token");
                "local".to_string()
            }
            Err(_) => return Err(LlmError::MissingApiKey(api_key_env.to_string())),
        };

        Self::new(base_url, model, api_key)
    }

    /// Set the maximum number of attempts per completion, clamped to
    /// `1..=MAX_ATTEMPTS_LIMIT`
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.clamp(1, MAX_ATTEMPTS_LIMIT);
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable or keeps failing after all attempts
    /// - The model is not available
    /// - The response body is not a chat completion
    pub async fn complete_async(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.instructions },
                ChatMessage { role: "user", content: &request.prompt },
            ],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
            stream: false,
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_attempts {
            debug!(url = %url, model = %self.model, attempt = attempts + 1, "Sending completion request");

            match self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ChatResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return extract_content(parsed);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        let error = LlmError::Communication(format!("HTTP {}: {}", status, error_text));
                        if status.is_client_error() {
                            return Err(error);
                        }
                        last_error = Some(error);
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_attempts {
                let delay = backoff_delay(attempts);
                warn!("Completion attempt {} failed, retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LlmError::Communication("Max retries exceeded".to_string())
        }))
    }
}

/// Wait after the `failed`-th failed attempt: 1s, 2s, 4s, ... capped at [`MAX_BACKOFF`]
fn backoff_delay(failed: u32) -> Duration {
    let secs = 2u64.saturating_pow(failed.saturating_sub(1));
    Duration::from_secs(secs).min(MAX_BACKOFF)
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    // Each sync call runs on its own short-lived runtime, so pooled connections
    // would outlive the runtime that opened them
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

fn extract_content(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("No content in response".to_string()))
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        // Blocking wrapper for the async client; callers run this off the async executor
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
        runtime.block_on(self.complete_async(request))
    }
}
