//! Prompt construction for report synthesis

use lector_domain::traits::CompletionRequest;
use lector_domain::{ChunkAnalysis, Language, ReportSection};

use crate::config::SynthesizerConfig;
use crate::error::SynthesizerError;

/// Instructions naming the ten sections, each with its canonical title and JSON key
pub fn synthesis_instructions(language: Language, segments: usize) -> String {
    let mut instructions = String::new();

    instructions.push_str(&format!(
        "You are given the analyses of all {} parts of an academic document, in order. \
         Combine them into one coherent report on the whole work.\n\n",
        segments
    ));

    instructions.push_str("The report has exactly these sections:\n");
    for (i, section) in ReportSection::ALL.iter().enumerate() {
        instructions.push_str(&format!(
            "{}. {} (key \"{}\"): {}\n",
            i + 1,
            section.title(language),
            section.key(),
            section.description()
        ));
    }
    instructions.push('\n');

    instructions.push_str(
        "Parts marked as failed carry no findings; rely on the other parts for those topics.\n",
    );
    instructions.push_str(&format!("Write the report in {}.\n\n", language.name()));
    instructions.push_str(OUTPUT_FORMAT_REMINDER);

    instructions
}

/// Build the synthesis request; the prompt is the ordered analyses as JSON
pub fn build_request(
    analyses: &[ChunkAnalysis],
    config: &SynthesizerConfig,
) -> Result<CompletionRequest, SynthesizerError> {
    let payload = serde_json::to_string_pretty(analyses)?;

    Ok(
        CompletionRequest::new(synthesis_instructions(config.language, analyses.len()), payload)
            .with_max_output_tokens(config.max_output_tokens)
            .with_temperature(config.temperature),
    )
}

const OUTPUT_FORMAT_REMINDER: &str = "Output format: a single JSON object mapping each \
section key to its text.\n\
Remember: Return ONLY valid JSON, no markdown code blocks, no explanations.";
