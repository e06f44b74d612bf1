//! Summaries of a reference written from its metadata alone
//!
//! Used when a document has no usable text. The result is always returned: an
//! unusable response falls back to a sentence built from the metadata, and a failed
//! call to a fixed notice.

use crate::config::SummaryConfig;
use lector_domain::traits::{CompletionRequest, LlmProvider};
use lector_domain::{Language, Metadata, MetadataSummary, SummarySource};
use lector_llm::{normalize_key, parse_json_object, value_to_text, SerialOracle};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Asks the oracle what a reference probably covers, given only its metadata
pub struct MetadataSummarizer<L>
where
    L: LlmProvider,
{
    oracle: SerialOracle<L>,
    config: SummaryConfig,
}

impl<L> MetadataSummarizer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new MetadataSummarizer
    pub fn new(llm_provider: L, config: SummaryConfig) -> Self {
        Self::from_oracle(SerialOracle::new(llm_provider), config)
    }

    /// Create a MetadataSummarizer whose calls take turns with the other stages on `oracle`
    pub fn from_oracle(oracle: SerialOracle<L>, config: SummaryConfig) -> Self {
        Self { oracle, config }
    }

    /// Summarize `metadata`. Never fails; see [`SummarySource`] for how the text was made.
    pub async fn summarize(&self, metadata: &Metadata) -> MetadataSummary {
        let language = self.config.language;
        let request = CompletionRequest::new(summary_instructions(language), metadata_prompt(metadata))
            .with_max_output_tokens(self.config.max_output_tokens)
            .with_temperature(self.config.temperature);

        let response = match self.oracle.complete(request, self.config.call_timeout()).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Metadata summary failed: {}", e);
                return MetadataSummary::new(
                    unavailable_text(language),
                    Vec::new(),
                    SummarySource::Unavailable,
                );
            }
        };
        debug!("LLM response length: {} chars", response.len());

        match parse_summary(&response, language) {
            Some(summary) => {
                info!("Metadata summary complete");
                summary
            }
            None => {
                warn!("Metadata summary response is not a JSON object; using fallback text");
                fallback_summary(metadata, language)
            }
        }
    }
}

/// Read `summary` and `keyPoints` out of a response. `None` when there is no JSON object.
///
/// A missing summary is replaced by a notice that only metadata was available.
fn parse_summary(response: &str, language: Language) -> Option<MetadataSummary> {
    let object = parse_json_object(response)?;
    let field = |wanted: &str| {
        object
            .iter()
            .find(|(key, _)| normalize_key(key) == wanted)
            .map(|(_, value)| value)
    };

    let summary = field("summary")
        .and_then(value_to_text)
        .unwrap_or_else(|| metadata_only_notice(language).to_string());
    let key_points = match field("keypoints") {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_text).collect(),
        Some(other) => value_to_text(other).into_iter().collect(),
        None => Vec::new(),
    };

    Some(MetadataSummary::new(summary, key_points, SummarySource::Oracle))
}

/// Summary built locally when the oracle answered with something unusable
fn fallback_summary(metadata: &Metadata, language: Language) -> MetadataSummary {
    let title = metadata.title.clone();
    let authors = Some(metadata.authors_text()).filter(|a| !a.is_empty());
    let year = metadata.year.clone();

    let (summary, key_point) = match language {
        Language::English => (
            format!(
                "This is an automatic summary based only on the available metadata of the \
                 document \"{}\" by {} ({}). The full text could not be accessed, so this \
                 summary is an estimate of its content.",
                title.as_deref().unwrap_or("Untitled"),
                authors.as_deref().unwrap_or("unknown author"),
                year.as_deref().unwrap_or("unknown date"),
            ),
            "Limited metadata available, without access to the full text",
        ),
        Language::Portuguese => (
            format!(
                "Este é um resumo automático baseado apenas nos metadados disponíveis do \
                 documento \"{}\" de {} ({}). Como não foi possível acessar o texto completo, \
                 este resumo é uma estimativa do conteúdo.",
                title.as_deref().unwrap_or("Sem título"),
                authors.as_deref().unwrap_or("autor desconhecido"),
                year.as_deref().unwrap_or("data desconhecida"),
            ),
            "Metadados limitados disponíveis, sem acesso ao texto completo",
        ),
    };

    MetadataSummary::new(summary, vec![key_point.to_string()], SummarySource::Fallback)
}

fn metadata_only_notice(language: Language) -> &'static str {
    match language {
        Language::English => {
            "Summary generated only from the available metadata, without access to the full text."
        }
        Language::Portuguese => {
            "Resumo gerado apenas com base nos metadados disponíveis, sem acesso ao texto completo."
        }
    }
}

fn unavailable_text(language: Language) -> &'static str {
    match language {
        Language::English => "Could not generate a summary from the available metadata.",
        Language::Portuguese => "Não foi possível gerar um resumo a partir dos metadados disponíveis.",
    }
}

fn summary_instructions(language: Language) -> String {
    format!(
        "You summarize a bibliographic reference from its metadata alone.\n\
         Write a brief summary of what the work probably covers and a few likely key points.\n\
         State clearly that the summary is based on metadata, not on the full text.\n\
         Write in {}.\n\n\
         Output format: {{\"summary\": \"...\", \"keyPoints\": [\"...\"]}}\n\
         Remember: Return ONLY valid JSON, no markdown code blocks, no explanations.",
        language.name()
    )
}

fn metadata_prompt(metadata: &Metadata) -> String {
    const MISSING: &str = "Not available";
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.to_string());
    let list = |items: Vec<&str>| {
        if items.is_empty() {
            MISSING.to_string()
        } else {
            items.join(", ")
        }
    };

    format!(
        "Reference metadata:\n\
         Title: {}\n\
         Authors: {}\n\
         Year: {}\n\
         Publication: {}\n\
         Tags: {}\n\
         Abstract: {}",
        text(&metadata.title),
        list(metadata.authors.iter().map(String::as_str).collect()),
        text(&metadata.year),
        text(&metadata.journal.clone().or_else(|| metadata.publisher.clone())),
        list(metadata.tags.iter().map(String::as_str).collect()),
        text(&metadata.abstract_text),
    )
}
