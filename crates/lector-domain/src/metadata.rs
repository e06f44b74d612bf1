//! Bibliographic metadata
//!
//! Metadata arrives from two places: a user-curated record and the oracle. Both are
//! decoded leniently, since the oracle freely returns `"year": 2020` or a lone author
//! string where a list was asked for.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Fields with a second accepted spelling, as `(field, alias)`
const ALIASED_FIELDS: [(&str, &str); 8] = [
    ("authors", "creators"),
    ("year", "date"),
    ("journal", "publicationTitle"),
    ("isbn", "ISBN"),
    ("doi", "DOI"),
    ("abstract", "abstractNote"),
    ("full_citation", "fullCitation"),
    ("in_text_citation", "inTextCitation"),
];

/// Semi-structured bibliographic record. Any field may be absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Title of the work
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author names, in order. Reference-manager `creators` objects are accepted.
    #[serde(
        default,
        alias = "creators",
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub authors: Vec<String>,

    /// Publication year (or a full date)
    #[serde(
        default,
        alias = "date",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,

    /// Publisher
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Journal or other venue
    #[serde(
        default,
        alias = "publicationTitle",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub journal: Option<String>,

    /// Volume
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    /// Issue
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,

    /// Page range
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,

    /// ISBN
    #[serde(
        default,
        alias = "ISBN",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<String>,

    /// DOI
    #[serde(
        default,
        alias = "DOI",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub doi: Option<String>,

    /// Abstract
    #[serde(
        rename = "abstract",
        alias = "abstractNote",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_text: Option<String>,

    /// Free-form tags
    #[serde(default, deserialize_with = "lenient_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    /// Formatted full (APA) citation
    #[serde(
        default,
        alias = "fullCitation",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_citation: Option<String>,

    /// Formatted parenthetical in-text citation
    #[serde(
        default,
        alias = "inTextCitation",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub in_text_citation: Option<String>,
}

impl Metadata {
    /// Parse a JSON object, tolerating loosely-typed values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str(json)? {
            Value::Object(object) => Self::from_object(object),
            other => serde_json::from_value(other),
        }
    }

    /// Decode a JSON object that may carry a field under both of its names.
    ///
    /// A field and its alias would otherwise be a duplicate-field error. The field
    /// wins unless it is blank, in which case the alias is used.
    pub fn from_object(mut object: Map<String, Value>) -> Result<Self, serde_json::Error> {
        for (field, alias) in ALIASED_FIELDS {
            if !(object.contains_key(field) && object.contains_key(alias)) {
                continue;
            }
            if object.get(field).and_then(value_text).is_none() {
                object.remove(field);
            } else {
                object.remove(alias);
            }
        }
        serde_json::from_value(Value::Object(object))
    }

    /// Authors joined with ", "
    pub fn authors_text(&self) -> String {
        self.authors.join(", ")
    }

    /// First four-digit run of `year`, so "2020-05-01" and "c. 2020" both yield "2020"
    pub fn publication_year(&self) -> Option<String> {
        let year = self.year.as_deref()?;
        let chars: Vec<char> = year.chars().collect();
        chars
            .windows(4)
            .find(|w| w.iter().all(|c| c.is_ascii_digit()))
            .map(|w| w.iter().collect())
    }
}

/// True when a text field is absent or contains only whitespace
pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            Some(parts.join(", ")).filter(|s| !s.is_empty())
        }
        Value::Object(map) => {
            // {"name": ..}, {"tag": ..} or {"firstName": .., "lastName": ..}
            for key in ["name", "tag"] {
                if let Some(text) = map.get(key).and_then(value_text) {
                    return Some(text);
                }
            }
            let given = map
                .get("firstName")
                .or_else(|| map.get("given"))
                .and_then(value_text);
            let family = map
                .get("lastName")
                .or_else(|| map.get("family"))
                .and_then(value_text);
            match (given, family) {
                (Some(g), Some(f)) => Some(format!("{} {}", g, f)),
                (g, f) => g.or(f),
            }
        }
    }
}

fn value_items(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_text).collect(),
        other => value_text(&other).into_iter().collect(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(&value))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_items(Value::deserialize(deserializer)?))
}

fn lenient_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_items(Value::deserialize(deserializer)?).into_iter().collect())
}
