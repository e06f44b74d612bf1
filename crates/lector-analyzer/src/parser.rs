//! Parse oracle output into segment findings

use crate::error::AnalyzerError;
use lector_domain::{AnalysisField, Findings};
use lector_llm::{normalize_key, parse_json_object, value_to_text};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse an analysis response into findings.
///
/// The JSON object may be wrapped in prose or a code fence. Keys are matched loosely
/// (`researchProblem`, `Research Problem` and `research_problem` are the same field).
/// Fields the object omits become the not-mentioned sentinel, but an object that
/// matches none of the eight fields is rejected.
pub fn parse_findings(response: &str) -> Result<Findings, AnalyzerError> {
    let object = parse_json_object(response).ok_or_else(|| {
        AnalyzerError::InvalidFormat("No JSON object in response".to_string())
    })?;

    let matched = AnalysisField::ALL
        .iter()
        .filter(|field| lookup(&object, **field).is_some())
        .count();

    if matched == 0 {
        return Err(AnalyzerError::InvalidFormat(
            "JSON object has none of the analysis fields".to_string(),
        ));
    }

    debug!("Matched {}/{} analysis fields", matched, AnalysisField::ALL.len());

    Ok(Findings::from_lookup(|field| {
        lookup(&object, field).and_then(value_to_text)
    }))
}

fn lookup(object: &Map<String, Value>, field: AnalysisField) -> Option<&Value> {
    let wanted = normalize_key(field.key());
    object
        .iter()
        .find(|(key, _)| normalize_key(key) == wanted)
        .map(|(_, value)| value)
}
