//! Recovering report sections from oracle output
//!
//! Two readers share one output shape, a map from [`ReportSection`] to its text:
//!
//! - [`structured_sections`] reads a JSON object keyed by section
//! - [`scan_sections`] looks for `TITLE:` headings in free text and captures up to the
//!   next numbered heading (`2. Something:`) or the end of the text
//!
//! Sections a reader cannot find are simply absent from the map.

use lector_domain::{Language, ReportSection};
use lector_llm::{normalize_key, parse_json_object, value_to_text};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Section texts recovered from one response
pub type SectionMap = BTreeMap<ReportSection, String>;

/// A numbered heading: `2. TITLE:`. The colon keeps years and figure numbers in
/// running prose ("in 2020. The", "Table 3. Results") from ending a section.
static NEXT_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\s+[^\n.:]{1,80}:").unwrap());

static HEADINGS: Lazy<Vec<(Language, ReportSection, Regex)>> = Lazy::new(|| {
    let mut headings = Vec::new();
    for language in Language::ALL {
        for section in ReportSection::ALL {
            // Tolerates markdown emphasis around the title: **TITLE**: or **TITLE:**
            let pattern = format!(r"(?i){}\**\s*:\**", regex::escape(section.title(language)));
            headings.push((language, section, Regex::new(&pattern).unwrap()));
        }
    }
    headings
});

/// Read sections from a JSON object in the response.
///
/// Keys match a section when they normalize to its snake_case key or to its title in
/// either language. Returns `None` when there is no object or no key matches.
pub fn structured_sections(response: &str) -> Option<SectionMap> {
    let object = parse_json_object(response)?;
    let sections = sections_from_object(&object);

    if !sections.is_empty() {
        return Some(sections);
    }

    // {"report": {...}}
    match object.values().collect::<Vec<_>>().as_slice() {
        [Value::Object(inner)] => Some(sections_from_object(inner)).filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn sections_from_object(object: &Map<String, Value>) -> SectionMap {
    let mut sections = SectionMap::new();

    for (key, value) in object {
        let key = normalize_key(key);
        let section = ReportSection::ALL.into_iter().find(|section| {
            key == normalize_key(section.key())
                || Language::ALL
                    .iter()
                    .any(|language| key == normalize_key(section.title(*language)))
        });

        if let (Some(section), Some(text)) = (section, value_to_text(value)) {
            sections.entry(section).or_insert(text);
        }
    }

    sections
}

/// Scan free text for `TITLE:` headings.
///
/// Headings are matched case-insensitively, trying `language`'s titles first and then
/// the other language's. A heading followed by nothing before the next numbered
/// heading yields no entry.
pub fn scan_sections(text: &str, language: Language) -> SectionMap {
    let mut sections = SectionMap::new();

    for section in ReportSection::ALL {
        let captured = heading_patterns(section, language)
            .find_map(|pattern| capture_after(text, pattern));

        if let Some(captured) = captured {
            sections.insert(section, captured);
        }
    }

    sections
}

fn heading_patterns(
    section: ReportSection,
    preferred: Language,
) -> impl Iterator<Item = &'static Regex> {
    let preferred_first = HEADINGS
        .iter()
        .filter(move |(language, s, _)| *s == section && *language == preferred);
    let others = HEADINGS
        .iter()
        .filter(move |(language, s, _)| *s == section && *language != preferred);

    preferred_first.chain(others).map(|(_, _, pattern)| pattern)
}

fn capture_after(text: &str, heading: &Regex) -> Option<String> {
    let found = heading.find(text)?;
    let rest = &text[found.end()..];
    let end = NEXT_HEADING.find(rest).map_or(rest.len(), |next| next.start());

    // Closing emphasis of the next heading (`**2. NEXT**`) stays behind the cut
    let captured = rest[..end].trim().trim_end_matches('*').trim_end();
    if captured.is_empty() {
        None
    } else {
        Some(captured.to_string())
    }
}
