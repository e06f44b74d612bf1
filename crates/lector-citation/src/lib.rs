//! Lector Citation
//!
//! The metadata branch of the pipeline: infer bibliographic metadata from a document,
//! merge it into the user's record, and format citations for the result.
//!
//! - [`MetadataInferrer`] reads the first pages of a document through the LLM
//! - [`merge`] fills gaps in the existing record without overwriting anything
//! - [`CitationResolver`] asks the LLM for APA citations and falls back to a
//!   deterministic format when the answer is unusable
//!
//! All three are total: failures are logged and replaced by empty metadata or the
//! fallback citation.
//!
//! # Example Usage
//!
//! ```no_run
//! use lector_citation::{merge, CitationConfig, CitationResolver};
//! use lector_domain::Metadata;
//! use lector_llm::MockProvider;
//!
//! # async fn example() {
//! let existing = Metadata::from_json(r#"{"title": "Bees"}"#).unwrap();
//! let inferred = Metadata::from_json(r#"{"title": "ignored", "year": 1967}"#).unwrap();
//! let mut merged = merge(existing, inferred);
//!
//! let resolver = CitationResolver::new(MockProvider::new("{}"), CitationConfig::default());
//! let citation = resolver.resolve(&merged).await;
//! citation.apply_to(&mut merged);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod inference;
mod merger;
mod resolver;

pub use config::{CitationConfig, InferenceConfig};
pub use error::CitationError;
pub use inference::{parse_metadata, MetadataInferrer};
pub use merger::merge;
pub use resolver::{
    fallback_citation, parse_citation, CitationResolver, ANONYMOUS_AUTHOR, NO_DATE, UNTITLED,
};
