//! Document segments

use serde::Serialize;

/// A bounded-size contiguous slice of a document's text.
///
/// Only the segmenter creates segments. Lengths are counted in chars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    index: usize,
    text: String,
    length: usize,
}

impl Segment {
    /// Create a segment at the given zero-based position
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self { index, text, length }
    }

    /// Zero-based position within the document
    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based position, as shown to the oracle and in logs
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    /// Segment text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars
    pub fn length(&self) -> usize {
        self.length
    }
}
