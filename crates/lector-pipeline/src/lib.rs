//! Lector Pipeline
//!
//! Processes one document end to end with a shared LLM provider.
//!
//! # Architecture
//!
//! ```text
//!            ┌─ segment → ChunkAnalyzer (sequential) → Synthesizer ─→ ReportOutcome
//! document ──┤
//!            └─ MetadataInferrer → merge → CitationResolver ────────→ Metadata + Citation
//! ```
//!
//! The report branch fails as a whole only when synthesis fails or the text is too
//! short; per-segment failures degrade single analyses. With
//! [`ShortTextPolicy::SummarizeMetadata`] a short text yields a metadata-only summary
//! instead of a failure. All stages share one [`lector_llm::SerialOracle`], so at most
//! one oracle call is in flight per pipeline, timed-out calls included. The metadata branch never
//! fails. Each run is wrapped in a `document` tracing span carrying a UUIDv7 `run_id`.
//!
//! # Example Usage
//!
//! ```no_run
//! use lector_pipeline::{DocumentPipeline, DocumentRequest, PipelineConfig};
//! use lector_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = DocumentPipeline::new(MockProvider::new("{}"), PipelineConfig::default())?;
//!
//! let outcome = pipeline
//!     .process(DocumentRequest::new("doc-001", "Long document text..."))
//!     .await;
//!
//! match outcome.report() {
//!     Some(report) => println!("{:?}", report.missing_sections()),
//!     None => eprintln!("No report: {}", outcome.failure().unwrap_or_default()),
//! }
//! println!("{}", outcome.citation.full_citation());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod pipeline;
mod types;

pub use config::{PipelineConfig, ShortTextPolicy, SingleSegmentPolicy};
pub use error::PipelineError;
pub use pipeline::DocumentPipeline;
pub use types::{DocumentOutcome, DocumentRequest, ReportOutcome};
