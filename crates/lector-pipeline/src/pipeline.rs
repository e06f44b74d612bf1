//! Per-document orchestration

use crate::config::{PipelineConfig, ShortTextPolicy, SingleSegmentPolicy};
use crate::error::PipelineError;
use crate::types::{DocumentOutcome, DocumentRequest, ReportOutcome};
use lector_analyzer::{segment, ChunkAnalyzer};
use lector_citation::{merge, CitationResolver, MetadataInferrer};
use lector_domain::traits::LlmProvider;
use lector_domain::{Citation, Metadata};
use lector_llm::SerialOracle;
use lector_synthesizer::{promote_analysis, MetadataSummarizer, Synthesizer};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs the report branch and the metadata branch for one document at a time.
///
/// Holds no per-document state, so one pipeline can process any number of
/// documents, one after another or from separate tasks.
pub struct DocumentPipeline<L>
where
    L: LlmProvider,
{
    analyzer: ChunkAnalyzer<L>,
    synthesizer: Synthesizer<L>,
    summarizer: MetadataSummarizer<L>,
    inferrer: MetadataInferrer<L>,
    resolver: CitationResolver<L>,
    config: PipelineConfig,
}

impl<L> DocumentPipeline<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a pipeline; every stage shares `llm_provider`
    pub fn new(llm_provider: L, config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::from_shared(Arc::new(llm_provider), config)
    }

    /// Create a pipeline over an already shared provider.
    ///
    /// The stages take turns on one [`SerialOracle`]: a call that outlived its timeout
    /// holds back the next call of any stage until it returns.
    pub fn from_shared(llm_provider: Arc<L>, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let oracle = SerialOracle::from_shared(llm_provider);

        Ok(Self {
            analyzer: ChunkAnalyzer::from_oracle(oracle.clone(), config.analyzer.clone()),
            synthesizer: Synthesizer::from_oracle(oracle.clone(), config.synthesizer.clone()),
            summarizer: MetadataSummarizer::from_oracle(oracle.clone(), config.summary.clone()),
            inferrer: MetadataInferrer::from_oracle(oracle.clone(), config.inference.clone()),
            resolver: CitationResolver::from_oracle(oracle, config.citation.clone()),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one document.
    ///
    /// Never fails as a whole: a rejected or failed report is reported in
    /// [`ReportOutcome::Failed`], and the metadata branch runs regardless. The
    /// metadata branch runs first so a metadata-only summary sees the merged record.
    pub async fn process(&self, request: DocumentRequest) -> DocumentOutcome {
        let run_id = Uuid::now_v7();
        let span = info_span!("document", %run_id, document_id = %request.document_id);

        async move {
            info!("Processing document ({} chars)", request.text.chars().count());

            let (metadata, citation) = self.process_metadata(&request.text, request.metadata).await;
            let report = self.process_report(&request.text, &metadata).await;

            match &report {
                ReportOutcome::Completed { segments, degraded_segments, .. } => info!(
                    "Document complete: {} segments, {} degraded",
                    segments, degraded_segments
                ),
                ReportOutcome::MetadataSummary { summary } => {
                    info!("Document summarized from metadata ({:?})", summary.source())
                }
                ReportOutcome::Failed { reason } => error!("Document report failed: {}", reason),
            }

            DocumentOutcome {
                run_id,
                document_id: request.document_id,
                report,
                metadata,
                citation,
            }
        }
        .instrument(span)
        .await
    }

    /// Segment, analyze and synthesize; a short text falls to the short-text policy
    async fn process_report(&self, text: &str, metadata: &Metadata) -> ReportOutcome {
        let length = text.chars().count();
        if length < self.config.min_text_chars {
            let err = PipelineError::TextTooShort {
                actual: length,
                minimum: self.config.min_text_chars,
            };
            return match self.config.short_text_policy {
                ShortTextPolicy::Reject => ReportOutcome::Failed { reason: err.to_string() },
                ShortTextPolicy::SummarizeMetadata => {
                    warn!("{}; summarizing metadata instead", err);
                    ReportOutcome::MetadataSummary {
                        summary: self.summarizer.summarize(metadata).await,
                    }
                }
            };
        }

        let segments = segment(text, self.config.analyzer.max_segment_chars);
        info!("Split text into {} segments", segments.len());

        let analyses = self.analyzer.analyze_all(&segments).await;
        let degraded_segments = analyses.iter().filter(|a| a.is_degraded()).count();

        if let [single] = analyses.as_slice() {
            if self.config.single_segment_policy == SingleSegmentPolicy::PromoteAnalysis {
                if let Some(report) = promote_analysis(single, self.config.synthesizer.language) {
                    info!("Single segment promoted to report without synthesis");
                    return ReportOutcome::Completed {
                        report,
                        segments: 1,
                        degraded_segments,
                    };
                }
            }
        }

        match self.synthesizer.synthesize(&analyses).await {
            Ok(report) => ReportOutcome::Completed {
                report,
                segments: segments.len(),
                degraded_segments,
            },
            Err(e) => ReportOutcome::Failed {
                reason: PipelineError::from(e).to_string(),
            },
        }
    }

    /// Infer, merge, then resolve and apply the citation
    async fn process_metadata(&self, text: &str, existing: Metadata) -> (Metadata, Citation) {
        let inferred = if self.config.infer_metadata && !text.trim().is_empty() {
            self.inferrer.infer(text).await
        } else {
            Metadata::default()
        };

        let mut metadata = merge(existing, inferred);
        let citation = self.resolver.resolve(&metadata).await;
        citation.apply_to(&mut metadata);

        (metadata, citation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lector_llm::MockProvider;

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = PipelineConfig::default();
        config.analyzer.max_segment_chars = 0;

        let result = DocumentPipeline::new(MockProvider::default(), config);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_short_text_fails_report_but_resolves_citation() {
        let llm = MockProvider::new("not json");
        let pipeline = DocumentPipeline::new(llm.clone(), PipelineConfig::local()).unwrap();

        let outcome = pipeline.process(DocumentRequest::new("doc-1", "Too short.")).await;

        assert!(outcome.failure().unwrap().contains("too short"));
        assert_eq!(outcome.citation.in_text_citation(), "(Anonymous, n.d.)");
        assert_eq!(
            outcome.metadata.in_text_citation.as_deref(),
            Some("(Anonymous, n.d.)")
        );
        // Inference and citation only
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_run_ids_are_unique() {
        let pipeline =
            DocumentPipeline::new(MockProvider::new("{}"), PipelineConfig::local()).unwrap();

        let first = pipeline.process(DocumentRequest::new("a", "")).await;
        let second = pipeline.process(DocumentRequest::new("a", "")).await;

        assert_ne!(first.run_id, second.run_id);
        assert_eq!(first.document_id, "a");
    }
}
