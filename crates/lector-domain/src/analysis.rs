//! Per-segment analyses
//!
//! A [`ChunkAnalysis`] always exposes the eight canonical fields. When the oracle call or
//! its response failed, the analysis is *degraded*: it carries the failure as data and
//! every field reads as [`NOT_ANALYZED`].

use serde::Serialize;

/// Sentinel the oracle is told to use for fields absent from a segment.
/// Also substituted when a parsed response omits a field or leaves it blank.
pub const NOT_MENTIONED: &str = "Not mentioned in this section";

/// Field value reported by a degraded analysis
pub const NOT_ANALYZED: &str = "Not analyzed: the analysis of this section failed";

/// The eight canonical fields extracted from every segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnalysisField {
    /// Research problem or questions addressed
    ResearchProblem,
    /// Methodology mentioned or used
    Methodology,
    /// Results or evidence presented
    Results,
    /// Theoretical or conceptual arguments
    TheoreticalArgument,
    /// Contributions to the field
    Contributions,
    /// Limitations mentioned
    Limitations,
    /// Connections with the literature
    LiteratureConnections,
    /// Conclusions or implications
    Conclusions,
}

impl AnalysisField {
    /// All fields in canonical order
    pub const ALL: [AnalysisField; 8] = [
        AnalysisField::ResearchProblem,
        AnalysisField::Methodology,
        AnalysisField::Results,
        AnalysisField::TheoreticalArgument,
        AnalysisField::Contributions,
        AnalysisField::Limitations,
        AnalysisField::LiteratureConnections,
        AnalysisField::Conclusions,
    ];

    /// JSON key requested from the oracle
    pub fn key(self) -> &'static str {
        match self {
            AnalysisField::ResearchProblem => "research_problem",
            AnalysisField::Methodology => "methodology",
            AnalysisField::Results => "results",
            AnalysisField::TheoreticalArgument => "theoretical_argument",
            AnalysisField::Contributions => "contributions",
            AnalysisField::Limitations => "limitations",
            AnalysisField::LiteratureConnections => "literature_connections",
            AnalysisField::Conclusions => "conclusions",
        }
    }

    /// What the oracle should put in this field
    pub fn description(self) -> &'static str {
        match self {
            AnalysisField::ResearchProblem => {
                "The research problem or questions addressed in this section"
            }
            AnalysisField::Methodology => "Methodology mentioned or used in this section",
            AnalysisField::Results => "Results or evidence presented in this section",
            AnalysisField::TheoreticalArgument => {
                "Important theoretical or conceptual arguments"
            }
            AnalysisField::Contributions => "Contributions to the field (if mentioned)",
            AnalysisField::Limitations => "Limitations mentioned (if any)",
            AnalysisField::LiteratureConnections => {
                "Connections with the literature (if cited)"
            }
            AnalysisField::Conclusions => "Conclusions or implications of this section",
        }
    }
}

/// Content extracted from one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Findings {
    /// Research problem or questions addressed
    pub research_problem: String,
    /// Methodology mentioned or used
    pub methodology: String,
    /// Results or evidence presented
    pub results: String,
    /// Theoretical or conceptual arguments
    pub theoretical_argument: String,
    /// Contributions to the field
    pub contributions: String,
    /// Limitations mentioned
    pub limitations: String,
    /// Connections with the literature
    pub literature_connections: String,
    /// Conclusions or implications
    pub conclusions: String,
}

impl Findings {
    /// Build findings from a per-field lookup.
    ///
    /// Fields the lookup cannot supply, or supplies blank, become [`NOT_MENTIONED`].
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(AnalysisField) -> Option<String>,
    {
        let mut value = |field| {
            lookup(field)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| NOT_MENTIONED.to_string())
        };

        Self {
            research_problem: value(AnalysisField::ResearchProblem),
            methodology: value(AnalysisField::Methodology),
            results: value(AnalysisField::Results),
            theoretical_argument: value(AnalysisField::TheoreticalArgument),
            contributions: value(AnalysisField::Contributions),
            limitations: value(AnalysisField::Limitations),
            literature_connections: value(AnalysisField::LiteratureConnections),
            conclusions: value(AnalysisField::Conclusions),
        }
    }

    /// Value of one field
    pub fn get(&self, field: AnalysisField) -> &str {
        match field {
            AnalysisField::ResearchProblem => &self.research_problem,
            AnalysisField::Methodology => &self.methodology,
            AnalysisField::Results => &self.results,
            AnalysisField::TheoreticalArgument => &self.theoretical_argument,
            AnalysisField::Contributions => &self.contributions,
            AnalysisField::Limitations => &self.limitations,
            AnalysisField::LiteratureConnections => &self.literature_connections,
            AnalysisField::Conclusions => &self.conclusions,
        }
    }
}

/// Why an analysis carries no findings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degradation {
    /// Diagnostic describing the failure
    pub error: String,

    /// Oracle text that could not be parsed, if the call itself succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

/// Result of analysing one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    /// The oracle returned parseable findings
    Extracted(Findings),
    /// The call or the parse failed
    Degraded(Degradation),
}

/// Structured analysis of exactly one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkAnalysis {
    #[serde(rename = "segment")]
    ordinal: usize,
    total: usize,
    #[serde(flatten)]
    outcome: AnalysisOutcome,
}

impl ChunkAnalysis {
    /// Analysis with extracted findings for the segment at zero-based `index`
    pub fn extracted(index: usize, total: usize, findings: Findings) -> Self {
        Self {
            ordinal: index + 1,
            total,
            outcome: AnalysisOutcome::Extracted(findings),
        }
    }

    /// Degraded analysis for the segment at zero-based `index`
    pub fn degraded(
        index: usize,
        total: usize,
        error: impl Into<String>,
        raw_content: Option<String>,
    ) -> Self {
        Self {
            ordinal: index + 1,
            total,
            outcome: AnalysisOutcome::Degraded(Degradation {
                error: error.into(),
                raw_content,
            }),
        }
    }

    /// Zero-based segment index
    pub fn index(&self) -> usize {
        self.ordinal - 1
    }

    /// Number of segments in the document
    pub fn total(&self) -> usize {
        self.total
    }

    /// Outcome of the analysis
    pub fn outcome(&self) -> &AnalysisOutcome {
        &self.outcome
    }

    /// Findings, when the analysis succeeded
    pub fn findings(&self) -> Option<&Findings> {
        match &self.outcome {
            AnalysisOutcome::Extracted(findings) => Some(findings),
            AnalysisOutcome::Degraded(_) => None,
        }
    }

    /// Value of one field; [`NOT_ANALYZED`] for a degraded analysis
    pub fn field(&self, field: AnalysisField) -> &str {
        match &self.outcome {
            AnalysisOutcome::Extracted(findings) => findings.get(field),
            AnalysisOutcome::Degraded(_) => NOT_ANALYZED,
        }
    }

    /// Whether the analysis failed
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Degraded(_))
    }

    /// Failure diagnostic, if degraded
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Degraded(d) => Some(&d.error),
            AnalysisOutcome::Extracted(_) => None,
        }
    }

    /// Unparseable oracle text, if degraded after a successful call
    pub fn raw_content(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Degraded(d) => d.raw_content.as_deref(),
            AnalysisOutcome::Extracted(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_fills_missing_and_blank_with_sentinel() {
        let findings = Findings::from_lookup(|field| match field {
            AnalysisField::Methodology => Some("Survey of 200 firms".to_string()),
            AnalysisField::Results => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(findings.methodology, "Survey of 200 firms");
        assert_eq!(findings.results, NOT_MENTIONED);
        assert_eq!(findings.conclusions, NOT_MENTIONED);
    }

    #[test]
    fn test_degraded_analysis_exposes_every_field() {
        let analysis = ChunkAnalysis::degraded(1, 3, "timeout", None);

        assert!(analysis.is_degraded());
        assert_eq!(analysis.index(), 1);
        assert_eq!(analysis.error(), Some("timeout"));
        for field in AnalysisField::ALL {
            assert_eq!(analysis.field(field), NOT_ANALYZED);
        }
    }

    #[test]
    fn test_serializes_flat_with_segment_position() {
        let findings = Findings::from_lookup(|_| Some("x".to_string()));
        let analysis = ChunkAnalysis::extracted(0, 2, findings);

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["segment"], 1);
        assert_eq!(json["total"], 2);
        assert_eq!(json["research_problem"], "x");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_degraded_serialization_omits_missing_raw_content() {
        let analysis = ChunkAnalysis::degraded(0, 1, "boom", None);
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["error"], "boom");
        assert!(json.get("raw_content").is_none());
        assert!(json.get("methodology").is_none());
    }

    #[test]
    fn test_field_keys_are_unique() {
        let mut keys: Vec<_> = AnalysisField::ALL.iter().map(|f| f.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 8);
    }
}
