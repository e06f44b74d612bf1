//! Error types for the document pipeline

use thiserror::Error;

/// Errors that can occur while setting up or running a document
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Document text below the configured minimum
    #[error("Document text too short: {actual} chars (minimum {minimum})")]
    TextTooShort {
        /// Length of the submitted text in chars
        actual: usize,
        /// Configured minimum
        minimum: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Synthesis failed; per-segment analyses are discarded
    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] lector_synthesizer::SynthesizerError),
}
