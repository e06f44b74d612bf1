//! Citation resolution with a deterministic fallback

use crate::config::CitationConfig;
use crate::error::CitationError;
use lector_domain::metadata::is_blank;
use lector_domain::traits::{CompletionRequest, LlmProvider};
use lector_domain::{Citation, CitationSource, Metadata};
use lector_llm::{normalize_key, parse_json_object, value_to_text, SerialOracle};
use tracing::{debug, info, warn};

/// Author and surname used when a record has no authors
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Title used when a record has none
pub const UNTITLED: &str = "Untitled";

/// Year used when a record has no recognizable year
pub const NO_DATE: &str = "n.d.";

/// Produces APA-style citations for a metadata record
pub struct CitationResolver<L>
where
    L: LlmProvider,
{
    oracle: SerialOracle<L>,
    config: CitationConfig,
}

impl<L> CitationResolver<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new CitationResolver
    pub fn new(llm_provider: L, config: CitationConfig) -> Self {
        Self::from_oracle(SerialOracle::new(llm_provider), config)
    }

    /// Create a CitationResolver whose calls take turns with the other stages on `oracle`
    pub fn from_oracle(oracle: SerialOracle<L>, config: CitationConfig) -> Self {
        Self { oracle, config }
    }

    /// Resolve citations for `metadata`.
    ///
    /// Never fails. When the call fails or the response has no object carrying both
    /// citation fields, the citation is built from the metadata instead.
    pub async fn resolve(&self, metadata: &Metadata) -> Citation {
        match self.request_citation(metadata).await {
            Ok(citation) => {
                info!("Citation resolved by oracle");
                citation
            }
            Err(e) => {
                warn!("Citation oracle unusable, using fallback: {}", e);
                fallback_citation(metadata)
            }
        }
    }

    async fn request_citation(&self, metadata: &Metadata) -> Result<Citation, CitationError> {
        let request = CompletionRequest::new(CITATION_INSTRUCTIONS, citation_prompt(metadata))
            .with_max_output_tokens(self.config.max_output_tokens)
            .with_temperature(self.config.temperature);

        let response = self.oracle.complete(request, self.config.call_timeout()).await?;
        debug!("LLM response length: {} chars", response.len());

        parse_citation(&response)
    }
}

/// Read both citation fields from the first JSON object in a response
pub fn parse_citation(response: &str) -> Result<Citation, CitationError> {
    let object = parse_json_object(response)
        .ok_or_else(|| CitationError::InvalidFormat("No JSON object in response".to_string()))?;

    let field = |wanted: &str| {
        object
            .iter()
            .find(|(key, _)| normalize_key(key) == wanted)
            .and_then(|(_, value)| value_to_text(value))
    };

    match (field("fullcitation"), field("intextcitation")) {
        (Some(full), Some(in_text)) => Ok(Citation::new(full, in_text, CitationSource::Oracle)),
        _ => Err(CitationError::InvalidFormat(
            "Response lacks fullCitation or inTextCitation".to_string(),
        )),
    }
}

/// Build a citation from the metadata alone.
///
/// `{authors}. ({year}). {title}.` and `({surname}, {year})`, where the surname comes
/// from the last author. Succeeds for any record, including an empty one.
pub fn fallback_citation(metadata: &Metadata) -> Citation {
    let authors: Vec<&str> = metadata
        .authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();

    let author_text = if authors.is_empty() {
        ANONYMOUS_AUTHOR.to_string()
    } else {
        authors.join(", ")
    };
    let surname = authors
        .last()
        .map(|author| surname_of(author))
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS_AUTHOR);
    let year = metadata
        .publication_year()
        .unwrap_or_else(|| NO_DATE.to_string());
    let title = if is_blank(&metadata.title) {
        UNTITLED
    } else {
        metadata.title.as_deref().unwrap_or(UNTITLED).trim()
    };

    Citation::new(
        format!(
            "{}. ({}). {}.",
            author_text.trim_end_matches('.'),
            year,
            title.trim_end_matches('.')
        ),
        format!("({}, {})", surname, year),
        CitationSource::Fallback,
    )
}

/// "Doe, Jane" → "Doe"; "Jane Doe" → "Doe"
fn surname_of(author: &str) -> &str {
    match author.split_once(',') {
        Some((surname, _)) => surname.trim(),
        None => author.split_whitespace().last().unwrap_or(author),
    }
}

fn citation_prompt(metadata: &Metadata) -> String {
    let fields = [
        ("Title", metadata.title.clone()),
        ("Authors", Some(metadata.authors_text())),
        ("Year", metadata.publication_year().or_else(|| metadata.year.clone())),
        ("Publisher", metadata.publisher.clone()),
        ("Journal", metadata.journal.clone()),
        ("Volume", metadata.volume.clone()),
        ("Issue", metadata.issue.clone()),
        ("Pages", metadata.pages.clone()),
        ("DOI", metadata.doi.clone()),
        ("ISBN", metadata.isbn.clone()),
    ];

    fields
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value.as_deref().unwrap_or("").trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

const CITATION_INSTRUCTIONS: &str = r#"You format academic references.
Produce an APA-style full citation and a parenthetical in-text citation for the reference below.

Output format (JSON object only, no additional text):
{"fullCitation": "...", "inTextCitation": "(...)"}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
