//! Lector Analyzer
//!
//! Splits a document into bounded segments and extracts a structured analysis from
//! each one with an LLM.
//!
//! # Overview
//!
//! Long documents do not fit in a single oracle call. The segmenter packs blank-line
//! separated paragraphs into segments of at most `max_segment_chars` chars, and the
//! [`ChunkAnalyzer`] asks the oracle for eight named fields per segment.
//!
//! # Architecture
//!
//! ```text
//! Text → segment() → [Segment] → ChunkAnalyzer → LLM → [ChunkAnalysis] → Synthesizer
//! ```
//!
//! # Key Features
//!
//! - **Lossless segmentation**: segment texts concatenate back to the input
//! - **Failure isolation**: a failed or unparseable call degrades only its own segment
//! - **Rate limiting**: segments are analyzed in order with a pause between calls
//!
//! # Example Usage
//!
//! ```no_run
//! use lector_analyzer::{segment, AnalyzerConfig, ChunkAnalyzer};
//! use lector_llm::MockProvider;
//!
//! # async fn example() {
//! let config = AnalyzerConfig::default();
//! let segments = segment("First paragraph.\n\nSecond paragraph.", config.max_segment_chars);
//!
//! let analyzer = ChunkAnalyzer::new(MockProvider::new("{}"), config);
//! let analyses = analyzer.analyze_all(&segments).await;
//!
//! for analysis in &analyses {
//!     println!("segment {}: degraded = {}", analysis.index() + 1, analysis.is_degraded());
//! }
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod parser;
mod prompt;
mod segmenter;

#[cfg(test)]
mod tests;

pub use analyzer::{ChunkAnalyzer, INVALID_JSON_DIAGNOSTIC};
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use segmenter::segment;
