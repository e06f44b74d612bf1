//! Request and outcome types for one document run

use lector_domain::{Citation, Metadata, MetadataSummary, SynthesizedReport};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document to process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Caller's identifier for the document
    pub document_id: String,

    /// Full extracted text
    pub text: String,

    /// Existing, user-curated metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl DocumentRequest {
    /// Create a request with no existing metadata
    pub fn new(document_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            text: text.into(),
            metadata: Metadata::default(),
        }
    }

    /// Attach existing metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Result of the report branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// A complete ten-section report
    Completed {
        /// The report
        report: SynthesizedReport,
        /// Number of segments analysed
        segments: usize,
        /// Number of segments whose analysis degraded
        degraded_segments: usize,
    },
    /// The text was too short; a summary written from the metadata stands in
    MetadataSummary {
        /// The summary
        summary: MetadataSummary,
    },
    /// No report; nothing partial is kept
    Failed {
        /// Human-readable reason
        reason: String,
    },
}

/// Everything produced for one document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    /// Identifier of this run, also recorded on the tracing span
    pub run_id: Uuid,

    /// Caller's identifier for the document
    pub document_id: String,

    /// Report or explicit failure
    pub report: ReportOutcome,

    /// Merged metadata, with citation fields written
    pub metadata: Metadata,

    /// Resolved citation
    pub citation: Citation,
}

impl DocumentOutcome {
    /// The report, if synthesis completed
    pub fn report(&self) -> Option<&SynthesizedReport> {
        match &self.report {
            ReportOutcome::Completed { report, .. } => Some(report),
            _ => None,
        }
    }

    /// The metadata-only summary, if one stood in for the report
    pub fn metadata_summary(&self) -> Option<&MetadataSummary> {
        match &self.report {
            ReportOutcome::MetadataSummary { summary } => Some(summary),
            _ => None,
        }
    }

    /// Failure reason, if the report branch failed
    pub fn failure(&self) -> Option<&str> {
        match &self.report {
            ReportOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}
