//! Core ChunkAnalyzer implementation

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::parser::parse_findings;
use crate::prompt::AnalysisPromptBuilder;
use lector_domain::traits::LlmProvider;
use lector_domain::{ChunkAnalysis, Segment};
use lector_llm::SerialOracle;
use tracing::{debug, info, warn};

/// Diagnostic stored on an analysis whose oracle response could not be parsed
pub const INVALID_JSON_DIAGNOSTIC: &str = "Invalid JSON format in oracle response";

/// The ChunkAnalyzer turns each segment into a structured [`ChunkAnalysis`]
pub struct ChunkAnalyzer<L>
where
    L: LlmProvider,
{
    oracle: SerialOracle<L>,
    config: AnalyzerConfig,
}

impl<L> ChunkAnalyzer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new ChunkAnalyzer
    pub fn new(llm_provider: L, config: AnalyzerConfig) -> Self {
        Self::from_oracle(SerialOracle::new(llm_provider), config)
    }

    /// Create a ChunkAnalyzer whose calls take turns with the other stages on `oracle`
    pub fn from_oracle(oracle: SerialOracle<L>, config: AnalyzerConfig) -> Self {
        Self { oracle, config }
    }

    /// Active configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one segment out of `total`.
    ///
    /// Never fails: a call failure or an unparseable response yields a degraded
    /// analysis carrying the diagnostic.
    pub async fn analyze(&self, segment: &Segment, total: usize) -> ChunkAnalysis {
        let position = format!("{}/{}", segment.ordinal(), total);
        debug!("Analyzing segment {} ({} chars)", position, segment.length());

        let response = match self.call_llm(segment, total).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Analysis call for segment {} failed: {}", position, e);
                return ChunkAnalysis::degraded(
                    segment.index(),
                    total,
                    format!("Failed to analyze segment {}: {}", position, e),
                    None,
                );
            }
        };

        debug!("LLM response length: {} chars", response.len());

        match parse_findings(&response) {
            Ok(findings) => ChunkAnalysis::extracted(segment.index(), total, findings),
            Err(e) => {
                warn!("Analysis response for segment {} unusable: {}", position, e);
                ChunkAnalysis::degraded(
                    segment.index(),
                    total,
                    INVALID_JSON_DIAGNOSTIC,
                    Some(response),
                )
            }
        }
    }

    /// Analyze every segment in order, one call at a time.
    ///
    /// The configured delay separates consecutive calls; there is no delay after the
    /// last one.
    pub async fn analyze_all(&self, segments: &[Segment]) -> Vec<ChunkAnalysis> {
        let total = segments.len();
        let delay = self.config.inter_call_delay();
        let mut analyses = Vec::with_capacity(total);

        info!("Analyzing {} segments", total);

        for (position, segment) in segments.iter().enumerate() {
            if position > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            analyses.push(self.analyze(segment, total).await);
        }

        let degraded = analyses.iter().filter(|a| a.is_degraded()).count();
        info!(
            "Segment analysis complete: {} extracted, {} degraded",
            total - degraded,
            degraded
        );

        analyses
    }

    /// Call the LLM provider
    async fn call_llm(&self, segment: &Segment, total: usize) -> Result<String, AnalyzerError> {
        let request = AnalysisPromptBuilder::new(segment, total)
            .with_language(self.config.language)
            .build(&self.config);

        debug!("Prompt length: {} chars", request.instructions.len() + request.prompt.len());

        let response = self.oracle.complete(request, self.config.call_timeout()).await?;
        Ok(response)
    }
}
