//! Lector Domain Layer
//!
//! Core data model and trait interfaces for the document analysis pipeline.
//! Every other crate in the workspace depends on this one; it depends only on serde.
//!
//! ## Key Concepts
//!
//! - **Segment**: a bounded-size contiguous slice of a document's text
//! - **ChunkAnalysis**: the structured extraction produced from exactly one segment
//! - **SynthesizedReport**: the ten-section summary spanning a whole document
//! - **Metadata**: bibliographic fields about a document
//! - **Citation**: full and in-text reference strings
//! - **MetadataSummary**: a short summary written from metadata when no text is available
//! - **Sentinel**: an explicit placeholder meaning "content not present"
//!
//! ## Totality
//!
//! Analyses, reports and citations are always fully populated. Failures are carried
//! as data inside them rather than as missing values.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod citation;
pub mod language;
pub mod metadata;
pub mod report;
pub mod segment;
pub mod summary;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisField, AnalysisOutcome, ChunkAnalysis, Degradation, Findings};
pub use citation::{Citation, CitationSource};
pub use language::Language;
pub use metadata::Metadata;
pub use report::{ReportSection, ReportSource, SynthesizedReport};
pub use segment::Segment;
pub use summary::{MetadataSummary, SummarySource};
