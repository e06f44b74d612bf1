//! Error types for the Synthesizer
//!
//! Unlike segment analysis, a failed synthesis call is fatal for the document.

use lector_llm::LlmError;
use std::time::Duration;
use thiserror::Error;

/// Errors that abort a synthesis
#[derive(Error, Debug)]
pub enum SynthesizerError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Synthesis timeout
    #[error("Synthesis timeout after {0:?}")]
    Timeout(Duration),

    /// The analyses could not be serialized into a payload
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SynthesizerError {
    fn from(e: serde_json::Error) -> Self {
        SynthesizerError::Serialization(e.to_string())
    }
}

impl From<LlmError> for SynthesizerError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout(limit) => SynthesizerError::Timeout(limit),
            other => SynthesizerError::Llm(other.to_string()),
        }
    }
}
