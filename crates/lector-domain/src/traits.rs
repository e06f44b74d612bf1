//! Trait definitions for external interactions
//!
//! The oracle is modelled as one narrow capability. Timeouts and retries are layered
//! around it by callers; implementations live in other crates.

/// A single request to the text-generation oracle
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System-level instructions describing the task and output format
    pub instructions: String,

    /// The content to operate on
    pub prompt: String,

    /// Upper bound on generated tokens
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request with default output size (1000 tokens) and temperature (0.3)
    pub fn new(instructions: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            prompt: prompt.into(),
            max_output_tokens: 1000,
            temperature: 0.3,
        }
    }

    /// Set the output size bound
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (lector-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for the request
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;
}
