//! Core Synthesizer implementation

use crate::config::SynthesizerConfig;
use crate::error::SynthesizerError;
use crate::prompt::build_request;
use crate::sections::{scan_sections, structured_sections};
use lector_domain::analysis::AnalysisField;
use lector_domain::traits::LlmProvider;
use lector_domain::{ChunkAnalysis, Language, ReportSection, ReportSource, SynthesizedReport};
use lector_llm::SerialOracle;
use tracing::{debug, info, warn};

/// The Synthesizer merges ordered segment analyses into one ten-section report
pub struct Synthesizer<L>
where
    L: LlmProvider,
{
    oracle: SerialOracle<L>,
    config: SynthesizerConfig,
}

impl<L> Synthesizer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new Synthesizer
    pub fn new(llm_provider: L, config: SynthesizerConfig) -> Self {
        Self::from_oracle(SerialOracle::new(llm_provider), config)
    }

    /// Create a Synthesizer whose calls take turns with the other stages on `oracle`
    pub fn from_oracle(oracle: SerialOracle<L>, config: SynthesizerConfig) -> Self {
        Self { oracle, config }
    }

    /// Active configuration
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Synthesize a report from the analyses of every segment, in order.
    ///
    /// # Errors
    ///
    /// Fails only when the oracle call fails or times out. An unusable response is
    /// not an error: the sections are scanned out of the raw text instead.
    pub async fn synthesize(
        &self,
        analyses: &[ChunkAnalysis],
    ) -> Result<SynthesizedReport, SynthesizerError> {
        info!("Synthesizing report from {} analyses", analyses.len());

        let request = build_request(analyses, &self.config)?;
        debug!("Synthesis payload length: {} chars", request.prompt.len());

        let response = self.oracle.complete(request, self.config.call_timeout()).await?;

        debug!("LLM response length: {} chars", response.len());

        let report = report_from_response(&response, self.config.language);

        let missing = report.missing_sections();
        if !missing.is_empty() {
            warn!("{} report sections not found in oracle response", missing.len());
        }
        info!("Synthesis complete ({:?})", report.source());

        Ok(report)
    }
}

/// Read a report out of a synthesis response.
///
/// A JSON object keyed by section is used directly; anything else is scanned for
/// section headings and kept alongside the report as raw content.
fn report_from_response(response: &str, language: Language) -> SynthesizedReport {
    if let Some(mut sections) = structured_sections(response) {
        return SynthesizedReport::from_lookup(language, ReportSource::Structured, None, |s| {
            sections.remove(&s)
        });
    }

    warn!("Synthesis response is not structured; scanning for section headings");
    let mut sections = scan_sections(response, language);
    SynthesizedReport::from_lookup(
        language,
        ReportSource::Scanned,
        Some(response.to_string()),
        |s| sections.remove(&s),
    )
}

/// Build a report straight from the analysis of a one-segment document.
///
/// Results map to main results and conclusions to implications. The general summary
/// and critical analysis have no counterpart and read as not found. Returns `None`
/// for a degraded analysis.
pub fn promote_analysis(analysis: &ChunkAnalysis, language: Language) -> Option<SynthesizedReport> {
    let findings = analysis.findings()?;

    Some(SynthesizedReport::from_lookup(
        language,
        ReportSource::Promoted,
        None,
        |section| {
            let field = match section {
                ReportSection::ResearchProblem => AnalysisField::ResearchProblem,
                ReportSection::Methodology => AnalysisField::Methodology,
                ReportSection::MainResults => AnalysisField::Results,
                ReportSection::TheoreticalArgument => AnalysisField::TheoreticalArgument,
                ReportSection::Contributions => AnalysisField::Contributions,
                ReportSection::Limitations => AnalysisField::Limitations,
                ReportSection::LiteratureConnections => AnalysisField::LiteratureConnections,
                ReportSection::Implications => AnalysisField::Conclusions,
                ReportSection::GeneralSummary | ReportSection::CriticalAnalysis => return None,
            };
            Some(findings.get(field).to_string())
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lector_domain::analysis::NOT_MENTIONED;
    use lector_domain::Findings;
    use lector_llm::MockProvider;
    use std::time::Duration;

    fn single_analysis() -> Vec<ChunkAnalysis> {
        let findings = Findings::from_lookup(|field| match field {
            AnalysisField::Results => Some("Bees dance".to_string()),
            AnalysisField::Conclusions => Some("Dance is a code".to_string()),
            _ => None,
        });
        vec![ChunkAnalysis::extracted(0, 1, findings)]
    }

    #[tokio::test]
    async fn test_structured_response() {
        let llm = MockProvider::new(
            r#"{"general_summary": "About bees", "main_results": "Bees dance"}"#,
        );
        let synthesizer = Synthesizer::new(llm, SynthesizerConfig::default());

        let report = synthesizer.synthesize(&single_analysis()).await.unwrap();

        assert_eq!(report.source(), ReportSource::Structured);
        assert_eq!(report.section(ReportSection::GeneralSummary), "About bees");
        assert_eq!(
            report.section(ReportSection::Limitations),
            "Section LIMITATIONS not found"
        );
        assert!(report.raw_content().is_none());
    }

    #[tokio::test]
    async fn test_prose_response_is_scanned() {
        let prose = "1. RESUMO GERAL: Sobre abelhas. 2. PROBLEMA DE PESQUISA: Como dançam? \
                     3. METODOLOGIA: Observação.";
        let config = SynthesizerConfig {
            language: Language::Portuguese,
            ..Default::default()
        };
        let synthesizer = Synthesizer::new(MockProvider::new(prose), config);

        let report = synthesizer.synthesize(&single_analysis()).await.unwrap();

        assert_eq!(report.source(), ReportSource::Scanned);
        assert_eq!(report.section(ReportSection::ResearchProblem), "Como dançam?");
        assert_eq!(report.raw_content(), Some(prose));
        assert_eq!(
            report.section(ReportSection::CriticalAnalysis),
            "Seção ANÁLISE CRÍTICA não encontrada"
        );
        for section in ReportSection::ALL {
            assert!(!report.section(section).is_empty());
        }
    }

    #[tokio::test]
    async fn test_unusable_response_still_has_every_section() {
        let synthesizer =
            Synthesizer::new(MockProvider::new("Sorry, I cannot help."), SynthesizerConfig::default());

        let report = synthesizer.synthesize(&single_analysis()).await.unwrap();

        assert_eq!(report.missing_sections().len(), 10);
        assert_eq!(report.raw_content(), Some("Sorry, I cannot help."));
    }

    #[tokio::test]
    async fn test_call_failure_is_fatal() {
        let mut llm = MockProvider::default();
        llm.add_error("exactly these sections");
        let synthesizer = Synthesizer::new(llm, SynthesizerConfig::default());

        let result = synthesizer.synthesize(&single_analysis()).await;
        assert!(matches!(result, Err(SynthesizerError::Llm(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_fatal() {
        let llm = MockProvider::new("{}").with_latency(Duration::from_millis(300));
        let config = SynthesizerConfig {
            call_timeout_ms: 20,
            ..Default::default()
        };

        let result = Synthesizer::new(llm, config).synthesize(&single_analysis()).await;
        assert!(matches!(result, Err(SynthesizerError::Timeout(_))));
    }

    #[test]
    fn test_promote_analysis_maps_fields() {
        let analyses = single_analysis();
        let report = promote_analysis(&analyses[0], Language::English).unwrap();

        assert_eq!(report.source(), ReportSource::Promoted);
        assert_eq!(report.section(ReportSection::MainResults), "Bees dance");
        assert_eq!(report.section(ReportSection::Implications), "Dance is a code");
        assert_eq!(report.section(ReportSection::Methodology), NOT_MENTIONED);
        assert_eq!(
            report.missing_sections(),
            vec![ReportSection::GeneralSummary, ReportSection::CriticalAnalysis]
        );
    }

    #[test]
    fn test_promote_degraded_analysis() {
        let analysis = ChunkAnalysis::degraded(0, 1, "boom", None);
        assert!(promote_analysis(&analysis, Language::English).is_none());
    }
}
