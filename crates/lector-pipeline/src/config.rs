//! Configuration for the document pipeline

use crate::error::PipelineError;
use lector_analyzer::AnalyzerConfig;
use lector_citation::{CitationConfig, InferenceConfig};
use lector_domain::Language;
use lector_synthesizer::{SummaryConfig, SynthesizerConfig};
use serde::{Deserialize, Serialize};

/// What to do with a document that fits in a single segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleSegmentPolicy {
    /// Run the synthesis call as for any other document
    #[default]
    Synthesize,
    /// Build the report from the one analysis without a synthesis call.
    /// A degraded analysis is still synthesized.
    PromoteAnalysis,
}

/// What to do with a document whose text is shorter than `min_text_chars`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortTextPolicy {
    /// Fail the report branch
    #[default]
    Reject,
    /// Summarize the merged metadata instead of the text
    SummarizeMetadata,
}

/// Configuration for processing one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Documents shorter than this many chars are rejected
    pub min_text_chars: usize,

    /// Infer metadata from the text before resolving citations
    pub infer_metadata: bool,

    /// Handling of documents below `min_text_chars`
    pub short_text_policy: ShortTextPolicy,

    /// Handling of one-segment documents
    pub single_segment_policy: SingleSegmentPolicy,

    /// Segmentation and per-segment analysis
    pub analyzer: AnalyzerConfig,

    /// Report synthesis
    pub synthesizer: SynthesizerConfig,

    /// Metadata-only summaries
    pub summary: SummaryConfig,

    /// Metadata inference
    pub inference: InferenceConfig,

    /// Citation resolution
    pub citation: CitationConfig,
}

impl PipelineConfig {
    /// Set the language of every oracle-written text
    pub fn with_language(mut self, language: Language) -> Self {
        self.analyzer.language = language;
        self.synthesizer.language = language;
        self.summary.language = language;
        self
    }

    /// Local preset: no pause between analysis calls and longer timeouts
    pub fn local() -> Self {
        let mut config = Self {
            analyzer: AnalyzerConfig::local(),
            ..Self::default()
        };
        config.synthesizer.call_timeout_ms = 600_000;
        config
    }

    /// Validate the configuration and every component configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        let sections: [(&str, Result<(), String>); 5] = [
            ("analyzer", self.analyzer.validate()),
            ("synthesizer", self.synthesizer.validate()),
            ("summary", self.summary.validate()),
            ("inference", self.inference.validate()),
            ("citation", self.citation.validate()),
        ];

        for (name, result) in sections {
            result.map_err(|e| PipelineError::InvalidConfig(format!("[{}] {}", name, e)))?;
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 100,
            infer_metadata: true,
            short_text_policy: ShortTextPolicy::default(),
            single_segment_policy: SingleSegmentPolicy::default(),
            analyzer: AnalyzerConfig::default(),
            synthesizer: SynthesizerConfig::default(),
            summary: SummaryConfig::default(),
            inference: InferenceConfig::default(),
            citation: CitationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_text_chars, 100);
        assert_eq!(config.single_segment_policy, SingleSegmentPolicy::Synthesize);
        assert_eq!(config.short_text_policy, ShortTextPolicy::Reject);
    }

    #[test]
    fn test_short_text_policy_from_toml() {
        let toml_str = r#"
            short_text_policy = "summarize_metadata"

            [summary]
            max_output_tokens = 0
        "#;
        let config = PipelineConfig::from_toml(toml_str).unwrap();

        assert_eq!(config.short_text_policy, ShortTextPolicy::SummarizeMetadata);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[summary]"));
    }

    #[test]
    fn test_invalid_component_is_named() {
        let mut config = PipelineConfig::default();
        config.citation.max_output_tokens = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[citation]"));
    }

    #[test]
    fn test_nested_tables_from_toml() {
        let toml_str = r#"
            min_text_chars = 50
            single_segment_policy = "promote_analysis"

            [analyzer]
            max_segment_chars = 8000
            language = "portuguese"

            [citation]
            temperature = 0.0
        "#;
        let config = PipelineConfig::from_toml(toml_str).unwrap();

        assert_eq!(config.min_text_chars, 50);
        assert_eq!(config.single_segment_policy, SingleSegmentPolicy::PromoteAnalysis);
        assert_eq!(config.analyzer.max_segment_chars, 8_000);
        assert_eq!(config.analyzer.language, Language::Portuguese);
        assert_eq!(config.analyzer.inter_call_delay_ms, 1_000);
        assert_eq!(config.synthesizer.max_output_tokens, 4_000);
        assert!(config.infer_metadata);
    }

    #[test]
    fn test_with_language_sets_every_stage() {
        let config = PipelineConfig::default().with_language(Language::Portuguese);
        assert_eq!(config.analyzer.language, Language::Portuguese);
        assert_eq!(config.synthesizer.language, Language::Portuguese);
        assert_eq!(config.summary.language, Language::Portuguese);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::local();
        let parsed = PipelineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}
