//! Summaries written from bibliographic metadata alone

use serde::Serialize;

/// Which path produced a metadata summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// Parsed from the oracle response
    Oracle,
    /// The response was unusable; the text was built from the metadata
    Fallback,
    /// The oracle call failed
    Unavailable,
}

/// Short summary of a document whose full text was not available.
///
/// Always marked as metadata-based so it is never mistaken for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataSummary {
    summary: String,
    key_points: Vec<String>,
    source: SummarySource,
    metadata_only: bool,
}

impl MetadataSummary {
    /// Create a summary
    pub fn new(summary: impl Into<String>, key_points: Vec<String>, source: SummarySource) -> Self {
        Self {
            summary: summary.into(),
            key_points,
            source,
            metadata_only: true,
        }
    }

    /// Summary text
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Likely key points, possibly empty
    pub fn key_points(&self) -> &[String] {
        &self.key_points
    }

    /// Path that produced the summary
    pub fn source(&self) -> SummarySource {
        self.source
    }
}
