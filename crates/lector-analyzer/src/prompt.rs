//! Prompt construction for segment analysis

use lector_domain::analysis::{AnalysisField, NOT_MENTIONED};
use lector_domain::traits::CompletionRequest;
use lector_domain::{Language, Segment};

use crate::config::AnalyzerConfig;

/// Builds the oracle request for one segment
pub struct AnalysisPromptBuilder<'a> {
    segment: &'a Segment,
    total: usize,
    language: Language,
}

impl<'a> AnalysisPromptBuilder<'a> {
    /// Create a builder for `segment` out of `total` segments
    pub fn new(segment: &'a Segment, total: usize) -> Self {
        Self {
            segment,
            total,
            language: Language::default(),
        }
    }

    /// Language the oracle should write the field values in
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Instructions describing the eight fields and the segment's position
    pub fn instructions(&self) -> String {
        let mut instructions = String::new();

        instructions.push_str(&format!(
            "You are analyzing part {}/{} of an academic document. \
             Other parts are analyzed separately, so this part may cover only some topics.\n\n",
            self.segment.ordinal(),
            self.total.max(1)
        ));

        instructions.push_str("Extract the following fields from this part:\n");
        for (i, field) in AnalysisField::ALL.iter().enumerate() {
            instructions.push_str(&format!(
                "{}. {}: {}\n",
                i + 1,
                field.key(),
                field.description()
            ));
        }
        instructions.push('\n');

        instructions.push_str(&format!(
            "If a field is not covered by this part, set it to \"{}\".\n",
            NOT_MENTIONED
        ));
        instructions.push_str(&format!(
            "Write the field values in {}.\n\n",
            self.language.name()
        ));
        instructions.push_str(OUTPUT_FORMAT_REMINDER);

        instructions
    }

    /// Complete request with the segment text as the prompt
    pub fn build(&self, config: &AnalyzerConfig) -> CompletionRequest {
        CompletionRequest::new(self.instructions(), self.segment.text())
            .with_max_output_tokens(config.max_output_tokens)
            .with_temperature(config.temperature)
    }
}

const OUTPUT_FORMAT_REMINDER: &str = "Output format: a single JSON object whose keys are \
the field names above and whose values are strings.\n\
Remember: Return ONLY valid JSON, no markdown code blocks, no explanations.";
