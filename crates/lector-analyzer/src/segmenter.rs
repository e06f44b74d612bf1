//! Paragraph-aware segmentation of long documents
//!
//! Segments are contiguous slices of the input. Blank-line separators stay attached to
//! the paragraph before them, so concatenating the segments in order reproduces the
//! input exactly. Boundaries are computed as byte ranges first and only then turned
//! into owned segments.

use lector_domain::Segment;
use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Split `text` into ordered segments of at most `max_size` chars.
///
/// Consecutive paragraphs are packed into one segment while they fit. A paragraph
/// longer than `max_size` on its own is cut into `max_size`-char windows. A
/// `max_size` of zero is treated as one.
pub fn segment(text: &str, max_size: usize) -> Vec<Segment> {
    let max_size = max_size.max(1);
    let mut spans: Vec<(usize, usize)> = Vec::new();
    // (start, end, length in chars) of the segment being packed
    let mut current: Option<(usize, usize, usize)> = None;

    for (start, end) in paragraph_units(text) {
        let length = text[start..end].chars().count();

        match current {
            Some((open, _, packed)) if packed + length <= max_size => {
                current = Some((open, end, packed + length));
            }
            _ => {
                if let Some((open, close, _)) = current.take() {
                    spans.push((open, close));
                }
                if length <= max_size {
                    current = Some((start, end, length));
                } else {
                    spans.extend(hard_slices(text, start, end, max_size));
                }
            }
        }
    }

    if let Some((open, close, _)) = current {
        spans.push((open, close));
    }

    spans
        .into_iter()
        .enumerate()
        .map(|(index, (start, end))| Segment::new(index, &text[start..end]))
        .collect()
}

/// Byte ranges of each paragraph together with its trailing blank-line separator
fn paragraph_units(text: &str) -> Vec<(usize, usize)> {
    let mut units = Vec::new();
    let mut start = 0;

    for separator in PARAGRAPH_BREAK.find_iter(text) {
        units.push((start, separator.end()));
        start = separator.end();
    }
    if start < text.len() {
        units.push((start, text.len()));
    }

    units
}

/// Cut `text[start..end]` into consecutive windows of `limit` chars
fn hard_slices(text: &str, start: usize, end: usize, limit: usize) -> Vec<(usize, usize)> {
    let mut bounds: Vec<usize> = text[start..end]
        .char_indices()
        .map(|(offset, _)| start + offset)
        .step_by(limit)
        .collect();
    bounds.push(end);

    bounds.windows(2).map(|w| (w[0], w[1])).collect()
}
