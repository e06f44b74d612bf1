//! Integration tests for segmenting and analysing a document

#[cfg(test)]
mod tests {
    use crate::{segment, AnalyzerConfig, ChunkAnalyzer, INVALID_JSON_DIAGNOSTIC};
    use lector_domain::analysis::NOT_MENTIONED;
    use lector_domain::AnalysisField;
    use lector_domain::traits::{CompletionRequest, LlmProvider};
    use lector_llm::{LlmError, MockProvider, SerialOracle};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    /// Slow oracle that records the most calls it ever had running at once
    #[derive(Default)]
    struct SlowOracle {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl LlmProvider for SlowOracle {
        type Error = LlmError;

        fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(150));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(r#"{"results": "late"}"#.to_string())
        }
    }

    fn three_part_document() -> String {
        ["Alpha paragraph.", "Beta paragraph.", "Gamma paragraph."].join("\n\n")
    }

    #[tokio::test]
    async fn test_full_analysis_flow() {
        let mut llm = MockProvider::default();
        llm.add_response("part 1/3", r#"{"research_problem": "Alpha"}"#);
        llm.add_response("part 2/3", r#"{"research_problem": "Beta"}"#);
        llm.add_response("part 3/3", r#"{"research_problem": "Gamma"}"#);

        let config = AnalyzerConfig {
            max_segment_chars: 20,
            ..AnalyzerConfig::local()
        };
        let segments = segment(&three_part_document(), config.max_segment_chars);
        assert_eq!(segments.len(), 3);

        let analyzer = ChunkAnalyzer::new(llm.clone(), config);
        let analyses = analyzer.analyze_all(&segments).await;

        let problems: Vec<_> = analyses
            .iter()
            .map(|a| a.field(AnalysisField::ResearchProblem))
            .collect();
        assert_eq!(problems, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(analyses[2].field(AnalysisField::Methodology), NOT_MENTIONED);
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_calls_follow_segment_order() {
        let llm = MockProvider::new(r#"{"results": "r"}"#);
        let config = AnalyzerConfig {
            max_segment_chars: 20,
            ..AnalyzerConfig::local()
        };
        let segments = segment(&three_part_document(), config.max_segment_chars);

        ChunkAnalyzer::new(llm.clone(), config).analyze_all(&segments).await;

        let prompts: Vec<_> = llm.requests().into_iter().map(|r| r.prompt).collect();
        let texts: Vec<_> = segments.iter().map(|s| s.text().to_string()).collect();
        assert_eq!(prompts, texts);
    }

    #[tokio::test]
    async fn test_failed_segment_does_not_block_neighbours() {
        let mut llm = MockProvider::default();
        llm.add_response("part 1/3", r#"{"results": "first"}"#);
        llm.add_error("part 2/3");
        llm.add_response("part 3/3", "not json at all");

        let config = AnalyzerConfig {
            max_segment_chars: 20,
            ..AnalyzerConfig::local()
        };
        let segments = segment(&three_part_document(), config.max_segment_chars);
        let analyses = ChunkAnalyzer::new(llm, config).analyze_all(&segments).await;

        assert_eq!(analyses.len(), 3);
        assert!(!analyses[0].is_degraded());
        assert!(analyses[1].is_degraded());
        assert!(analyses[1].raw_content().is_none());
        assert_eq!(analyses[2].error(), Some(INVALID_JSON_DIAGNOSTIC));
        assert_eq!(analyses[2].raw_content(), Some("not json at all"));
    }

    #[tokio::test]
    async fn test_delay_between_calls() {
        let llm = MockProvider::new(r#"{"results": "r"}"#);
        let config = AnalyzerConfig {
            max_segment_chars: 20,
            inter_call_delay_ms: 40,
            ..AnalyzerConfig::local()
        };
        let segments = segment(&three_part_document(), config.max_segment_chars);

        let started = Instant::now();
        ChunkAnalyzer::new(llm, config).analyze_all(&segments).await;

        // Two gaps for three calls
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_empty_document_makes_no_calls() {
        let llm = MockProvider::default();
        let analyzer = ChunkAnalyzer::new(llm.clone(), AnalyzerConfig::local());

        let analyses = analyzer.analyze_all(&segment("", 100)).await;

        assert!(analyses.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_timed_out_segments_never_overlap() {
        let oracle = Arc::new(SlowOracle::default());
        let config = AnalyzerConfig {
            max_segment_chars: 20,
            call_timeout_ms: 20,
            ..AnalyzerConfig::local()
        };
        let segments = segment(&three_part_document(), config.max_segment_chars);

        let shared = SerialOracle::from_shared(Arc::clone(&oracle));
        let analyzer = ChunkAnalyzer::from_oracle(shared, config);
        let analyses = analyzer.analyze_all(&segments).await;

        assert!(analyses.iter().all(|a| a.is_degraded()));
        assert!(analyses[0].error().unwrap().contains("timeout"));
        assert_eq!(oracle.peak.load(Ordering::SeqCst), 1);
    }
}
