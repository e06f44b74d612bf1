//! Error types for citation resolution and metadata inference
//!
//! Neither operation surfaces these: they are logged and replaced by the fallback
//! citation or an empty metadata record.

use lector_llm::LlmError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the oracle about metadata
#[derive(Error, Debug)]
pub enum CitationError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Call timeout
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Response did not contain the expected structure
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON decoding error
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for CitationError {
    fn from(e: serde_json::Error) -> Self {
        CitationError::JsonParse(e.to_string())
    }
}

impl From<LlmError> for CitationError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout(limit) => CitationError::Timeout(limit),
            other => CitationError::Llm(other.to_string()),
        }
    }
}
