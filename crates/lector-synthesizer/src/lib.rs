//! Lector Synthesizer
//!
//! Aggregates the ordered per-segment analyses of a document into one report with ten
//! fixed sections, using a single LLM call.
//!
//! # Parsing
//!
//! The oracle is asked for a JSON object keyed by section. When it answers with prose
//! instead (typically numbered headings such as `1. GENERAL SUMMARY: ...`), the
//! section text is scanned out of the raw response, which is then kept on the report.
//! Either way every section is populated; a section that cannot be recovered holds a
//! "not found" sentinel naming it.
//!
//! A failed or timed-out synthesis call is the one error this crate returns.
//!
//! # Metadata summaries
//!
//! [`MetadataSummarizer`] covers documents without usable text: it asks for a short
//! summary and likely key points from the bibliographic metadata alone, and never fails.
//!
//! # Example Usage
//!
//! ```no_run
//! use lector_synthesizer::{Synthesizer, SynthesizerConfig};
//! use lector_llm::MockProvider;
//! use lector_domain::ReportSection;
//!
//! # async fn example(analyses: Vec<lector_domain::ChunkAnalysis>) -> Result<(), Box<dyn std::error::Error>> {
//! let synthesizer = Synthesizer::new(MockProvider::new("{}"), SynthesizerConfig::default());
//! let report = synthesizer.synthesize(&analyses).await?;
//!
//! println!("{}", report.section(ReportSection::GeneralSummary));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod prompt;
pub mod sections;
mod summary;
mod synthesizer;

pub use config::{SummaryConfig, SynthesizerConfig};
pub use error::SynthesizerError;
pub use summary::MetadataSummarizer;
pub use synthesizer::{promote_analysis, Synthesizer};
