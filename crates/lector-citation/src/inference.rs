//! Metadata inference from the opening of a document

use crate::config::InferenceConfig;
use crate::error::CitationError;
use lector_domain::traits::{CompletionRequest, LlmProvider};
use lector_domain::Metadata;
use lector_llm::{parse_json_object, SerialOracle};
use tracing::{debug, warn};

/// Asks the oracle for bibliographic metadata found in a document's first pages
pub struct MetadataInferrer<L>
where
    L: LlmProvider,
{
    oracle: SerialOracle<L>,
    config: InferenceConfig,
}

impl<L> MetadataInferrer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new MetadataInferrer
    pub fn new(llm_provider: L, config: InferenceConfig) -> Self {
        Self::from_oracle(SerialOracle::new(llm_provider), config)
    }

    /// Create a MetadataInferrer whose calls take turns with the other stages on `oracle`
    pub fn from_oracle(oracle: SerialOracle<L>, config: InferenceConfig) -> Self {
        Self { oracle, config }
    }

    /// Infer metadata from the leading `sample_chars` of `text`.
    ///
    /// Any failure yields an empty record, which leaves a subsequent merge unchanged.
    pub async fn infer(&self, text: &str) -> Metadata {
        match self.request_metadata(text).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Metadata inference failed: {}", e);
                Metadata::default()
            }
        }
    }

    async fn request_metadata(&self, text: &str) -> Result<Metadata, CitationError> {
        let sample: String = text.chars().take(self.config.sample_chars).collect();
        let request = CompletionRequest::new(INFERENCE_INSTRUCTIONS, sample)
            .with_max_output_tokens(self.config.max_output_tokens)
            .with_temperature(self.config.temperature);

        let response = self.oracle.complete(request, self.config.call_timeout()).await?;
        debug!("LLM response length: {} chars", response.len());

        parse_metadata(&response)
    }
}

/// Decode the first JSON object in a response as metadata
pub fn parse_metadata(response: &str) -> Result<Metadata, CitationError> {
    let object = parse_json_object(response)
        .ok_or_else(|| CitationError::InvalidFormat("No JSON object in response".to_string()))?;

    Ok(Metadata::from_object(object)?)
}

const INFERENCE_INSTRUCTIONS: &str = r#"You are a bibliographic assistant.
The text below is the opening of an academic document. Extract its bibliographic metadata.

Output format (JSON object only, omit fields that are not available):
{
  "title": "...",
  "authors": ["..."],
  "year": "YYYY",
  "publisher": "...",
  "journal": "...",
  "volume": "...",
  "issue": "...",
  "pages": "...",
  "isbn": "...",
  "doi": "...",
  "abstract": "..."
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;
    use lector_llm::MockProvider;
    use std::time::Duration;

    #[test]
    fn test_parse_lenient_metadata() {
        let response = r#"```json
{"title": "Bees", "authors": "K. von Frisch", "year": 1967, "date": "1967-01-01", "doi": null}
```"#;
        let metadata = parse_metadata(response).unwrap();

        assert_eq!(metadata.title.as_deref(), Some("Bees"));
        assert_eq!(metadata.authors, vec!["K. von Frisch"]);
        assert_eq!(metadata.year.as_deref(), Some("1967"));
        assert!(metadata.doi.is_none());
    }

    #[test]
    fn test_parse_metadata_without_object() {
        assert!(matches!(
            parse_metadata("I don't know."),
            Err(CitationError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_infer_samples_leading_chars() {
        let llm = MockProvider::new(r#"{"title": "T"}"#);
        let config = InferenceConfig {
            sample_chars: 5,
            ..Default::default()
        };
        let inferrer = MetadataInferrer::new(llm.clone(), config);

        let metadata = inferrer.infer("abcdefghij").await;

        assert_eq!(metadata.title.as_deref(), Some("T"));
        assert_eq!(llm.requests()[0].prompt, "abcde");
        assert_eq!(llm.requests()[0].max_output_tokens, 1_000);
    }

    #[tokio::test]
    async fn test_infer_failure_is_empty_metadata() {
        let mut llm = MockProvider::default();
        llm.add_error("bibliographic");
        let metadata = MetadataInferrer::new(llm, InferenceConfig::default())
            .infer("text")
            .await;
        assert_eq!(metadata, Metadata::default());
    }

    #[tokio::test]
    async fn test_infer_timeout_is_empty_metadata() {
        let llm = MockProvider::new(r#"{"title": "late"}"#).with_latency(Duration::from_millis(300));
        let config = InferenceConfig {
            call_timeout_ms: 20,
            ..Default::default()
        };
        let metadata = MetadataInferrer::new(llm, config).infer("text").await;
        assert_eq!(metadata, Metadata::default());
    }
}
