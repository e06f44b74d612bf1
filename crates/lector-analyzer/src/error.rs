//! Error types for the ChunkAnalyzer
//!
//! These classify failures before they are folded into a degraded `ChunkAnalysis`.
//! They never escape `ChunkAnalyzer::analyze`.

use lector_llm::LlmError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while analysing a segment
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Analysis timeout
    #[error("Analysis timeout after {0:?}")]
    Timeout(Duration),

    /// Response did not contain the expected structure
    #[error("Invalid analysis format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzerError::JsonParse(e.to_string())
    }
}

impl From<LlmError> for AnalyzerError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout(limit) => AnalyzerError::Timeout(limit),
            other => AnalyzerError::Llm(other.to_string()),
        }
    }
}
