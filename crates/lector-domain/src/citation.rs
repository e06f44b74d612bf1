//! Formatted citations

use crate::metadata::Metadata;
use serde::Serialize;

/// Which path produced a citation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationSource {
    /// Parsed from the oracle response
    Oracle,
    /// Built deterministically from the metadata
    Fallback,
}

/// Full and in-text citation strings, both non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    full_citation: String,
    in_text_citation: String,
    source: CitationSource,
}

impl Citation {
    /// Create a citation
    pub fn new(
        full_citation: impl Into<String>,
        in_text_citation: impl Into<String>,
        source: CitationSource,
    ) -> Self {
        Self {
            full_citation: full_citation.into(),
            in_text_citation: in_text_citation.into(),
            source,
        }
    }

    /// APA-style full citation
    pub fn full_citation(&self) -> &str {
        &self.full_citation
    }

    /// Parenthetical in-text citation
    pub fn in_text_citation(&self) -> &str {
        &self.in_text_citation
    }

    /// Path that produced the citation
    pub fn source(&self) -> CitationSource {
        self.source
    }

    /// Write both citation fields into a metadata record, replacing earlier values
    pub fn apply_to(&self, metadata: &mut Metadata) {
        metadata.full_citation = Some(self.full_citation.clone());
        metadata.in_text_citation = Some(self.in_text_citation.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overwrites_citation_fields() {
        let mut metadata = Metadata {
            full_citation: Some("old".to_string()),
            ..Default::default()
        };
        let citation = Citation::new("Doe, J. (2020). T.", "(Doe, 2020)", CitationSource::Oracle);

        citation.apply_to(&mut metadata);

        assert_eq!(metadata.full_citation.as_deref(), Some("Doe, J. (2020). T."));
        assert_eq!(metadata.in_text_citation.as_deref(), Some("(Doe, 2020)"));
    }
}
