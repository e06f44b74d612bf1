//! Helpers for reading structured data out of free-form oracle text
//!
//! Oracles asked for JSON routinely wrap it in code fences or a sentence of prose.
//! These helpers locate the object instead of trusting the response to be bare JSON.

use serde_json::{Map, Value};

/// Find the first balanced `{...}` substring, ignoring braces inside JSON strings.
///
/// An opening brace that is never closed is skipped and the scan resumes after it.
#[cfg(test)]
fn extract_json_object(response: &str) -> Option<&str> {
    balanced_objects(response).next()
}

/// Parse the first balanced substring that is a valid JSON object
pub fn parse_json_object(response: &str) -> Option<Map<String, Value>> {
    balanced_objects(response).find_map(|candidate| {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    })
}

/// Render a JSON value as plain text; `None` for null or blank values
pub fn value_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(value_to_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| value_to_text(v).map(|t| format!("{}: {}", k, t)))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Lowercase a key and drop everything but letters and digits, so that
/// `"research_problem"`, `"researchProblem"` and `"RESEARCH PROBLEM"` compare equal
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn balanced_objects(text: &str) -> impl Iterator<Item = &str> {
    let mut from = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = text[from..].find('{') {
            let start = from + offset;
            from = start + 1;
            if let Some(end) = matching_brace(text, start) {
                from = end;
                return Some(&text[start..end]);
            }
        }
        None
    })
}

/// Byte offset just past the brace closing the one at `start`
fn matching_brace(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_plain_object() {
        let json = r#"{"key": "value"}"#;
        assert_eq!(extract_json_object(json), Some(json));
    }

    #[test]
    fn test_extract_from_code_fence_and_prose() {
        let response = "Here is the citation:\n```json\n{\"fullCitation\": \"X\"}\n```\nHope it helps.";
        assert_eq!(extract_json_object(response), Some("{\"fullCitation\": \"X\"}"));
    }

    #[test]
    fn test_nested_objects_and_braces_in_strings() {
        let response = r#"note {"a": {"b": "}{"}, "c": "\"{"} trailing }"#;
        let object = extract_json_object(response).unwrap();
        assert_eq!(object, r#"{"a": {"b": "}{"}, "c": "\"{"}"#);
        assert!(parse_json_object(response).is_some());
    }

    #[test]
    fn test_unclosed_brace_is_skipped() {
        let response = r#"{ never closed {"ok": true}"#;
        let map = parse_json_object(response).unwrap();
        assert_eq!(map["ok"], json!(true));
    }

    #[test]
    fn test_prose_braces_before_real_object() {
        let response = r#"Use {braces} like this: {"ok": 1}"#;
        assert_eq!(extract_json_object(response), Some("{braces}"));
        let map = parse_json_object(response).unwrap();
        assert_eq!(map["ok"], json!(1));
    }

    #[test]
    fn test_no_object() {
        assert!(extract_json_object("plain prose").is_none());
        assert!(parse_json_object("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("research_problem"), "researchproblem");
        assert_eq!(normalize_key("researchProblem"), "researchproblem");
        assert_eq!(normalize_key("2. RESEARCH PROBLEM"), "2researchproblem");
        assert_eq!(normalize_key("ANÁLISE CRÍTICA"), "análisecrítica");
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!("  hi ")), Some("hi".to_string()));
        assert_eq!(value_to_text(&json!(["a", "b"])), Some("a\nb".to_string()));
        assert_eq!(value_to_text(&json!({"k": 1})), Some("k: 1".to_string()));
        assert_eq!(value_to_text(&json!("")), None);
        assert_eq!(value_to_text(&Value::Null), None);
    }
}
