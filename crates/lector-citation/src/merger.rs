//! Gap-filling merge of existing and inferred metadata

use lector_domain::metadata::is_blank;
use lector_domain::Metadata;
use std::collections::BTreeSet;

/// Merge oracle-inferred metadata into an existing record.
///
/// The existing record is authoritative: a field is taken from `inferred` only when the
/// existing value is absent, whitespace-only or an empty list, and the inferred value
/// is not. Populated fields are never replaced.
pub fn merge(existing: Metadata, inferred: Metadata) -> Metadata {
    let mut merged = existing;

    fill_text(&mut merged.title, inferred.title);
    fill_list(&mut merged.authors, inferred.authors);
    fill_text(&mut merged.year, inferred.year);
    fill_text(&mut merged.publisher, inferred.publisher);
    fill_text(&mut merged.journal, inferred.journal);
    fill_text(&mut merged.volume, inferred.volume);
    fill_text(&mut merged.issue, inferred.issue);
    fill_text(&mut merged.pages, inferred.pages);
    fill_text(&mut merged.isbn, inferred.isbn);
    fill_text(&mut merged.doi, inferred.doi);
    fill_text(&mut merged.abstract_text, inferred.abstract_text);
    fill_set(&mut merged.tags, inferred.tags);
    fill_text(&mut merged.full_citation, inferred.full_citation);
    fill_text(&mut merged.in_text_citation, inferred.in_text_citation);

    merged
}

fn fill_text(slot: &mut Option<String>, candidate: Option<String>) {
    if is_blank(slot) && !is_blank(&candidate) {
        *slot = candidate;
    }
}

fn fill_list(slot: &mut Vec<String>, candidate: Vec<String>) {
    if slot.is_empty() {
        *slot = candidate;
    }
}

fn fill_set(slot: &mut BTreeSet<String>, candidate: BTreeSet<String>) {
    if slot.is_empty() {
        *slot = candidate;
    }
}
