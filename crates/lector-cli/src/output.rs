//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lector_domain::{
    Citation, MetadataSummary, ReportSection, Segment, SummarySource, SynthesizedReport,
};
use lector_pipeline::{DocumentOutcome, ReportOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Chars of segment text shown in the segment table
const PREVIEW_CHARS: usize = 48;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the outcome of a document run.
    pub fn format_outcome(&self, outcome: &DocumentOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Text => Ok(self.format_outcome_text(outcome)),
        }
    }

    fn format_outcome_text(&self, outcome: &DocumentOutcome) -> String {
        let mut lines = vec![self.info(&format!(
            "Document {} (run {})",
            outcome.document_id, outcome.run_id
        ))];

        match &outcome.report {
            ReportOutcome::Completed {
                report,
                segments,
                degraded_segments,
            } => {
                lines.push(self.success(&format!(
                    "Report synthesized from {} segment(s)",
                    segments
                )));
                if *degraded_segments > 0 {
                    lines.push(self.warning(&format!(
                        "{} segment(s) could not be analyzed",
                        degraded_segments
                    )));
                }
                lines.push(String::new());
                lines.push(self.format_report(report));
            }
            ReportOutcome::MetadataSummary { summary } => {
                lines.push(self.warning("Text too short for a report; summarized from metadata"));
                lines.push(String::new());
                lines.push(self.format_metadata_summary(summary));
            }
            ReportOutcome::Failed { reason } => {
                lines.push(self.error(&format!("No report: {}", reason)));
            }
        }

        lines.push(String::new());
        lines.push(self.format_citation_text(&outcome.citation));
        lines.join("\n")
    }

    fn format_report(&self, report: &SynthesizedReport) -> String {
        ReportSection::ALL
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let heading = format!("{}. {}", i + 1, section.title(report.language()));
                format!(
                    "{}\n{}",
                    self.colorize(&heading, "cyan"),
                    report.section(*section)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn format_metadata_summary(&self, summary: &MetadataSummary) -> String {
        let mut text = format!("{}\n{}", self.colorize("Summary", "cyan"), summary.summary());
        if !summary.key_points().is_empty() {
            text.push_str(&format!("\n{}", self.colorize("Key points", "cyan")));
            for point in summary.key_points() {
                text.push_str(&format!("\n  - {}", point));
            }
        }
        if summary.source() != SummarySource::Oracle {
            text.push('\n');
            text.push_str(&self.warning("Summary built locally from the metadata"));
        }
        text
    }

    /// Format a segmentation preview.
    pub fn format_segments(&self, segments: &[Segment]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = segments
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "segment": s.ordinal(),
                            "length": s.length(),
                            "text": s.text(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Text => Ok(self.format_segments_table(segments)),
        }
    }

    fn format_segments_table(&self, segments: &[Segment]) -> String {
        if segments.is_empty() {
            return self.colorize("No segments (empty text).", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Segment", "Chars", "Starts with"]);

        for segment in segments {
            builder.push_record([
                format!("{}/{}", segment.ordinal(), segments.len()),
                segment.length().to_string(),
                preview(segment.text()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a resolved citation.
    pub fn format_citation(&self, citation: &Citation) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(citation)?),
            OutputFormat::Text => Ok(self.format_citation_text(citation)),
        }
    }

    fn format_citation_text(&self, citation: &Citation) -> String {
        let mut text = format!(
            "{}\n  {}\n{}\n  {}",
            self.colorize("Reference", "cyan"),
            citation.full_citation(),
            self.colorize("In-text", "cyan"),
            citation.in_text_citation()
        );
        if citation.source() == lector_domain::CitationSource::Fallback {
            text.push('\n');
            text.push_str(&self.warning("Citation built locally from the metadata"));
        }
        text
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().bold().to_string(),
            _ => text.to_string(),
        }
    }
}

/// First line of `text`, cut to [`PREVIEW_CHARS`]
fn preview(text: &str) -> String {
    let line = text.trim_start().lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lector_domain::{CitationSource, Language, Metadata, ReportSource};
    use uuid::Uuid;

    fn outcome(report: ReportOutcome) -> DocumentOutcome {
        DocumentOutcome {
            run_id: Uuid::nil(),
            document_id: "doc-1".to_string(),
            report,
            metadata: Metadata::default(),
            citation: Citation::new(
                "Anonymous. (n.d.). Untitled.",
                "(Anonymous, n.d.)",
                CitationSource::Fallback,
            ),
        }
    }

    fn report() -> SynthesizedReport {
        SynthesizedReport::from_lookup(Language::English, ReportSource::Structured, None, |s| {
            (s == ReportSection::Methodology).then(|| "Field observation".to_string())
        })
    }

    #[test]
    fn test_completed_outcome_text() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter
            .format_outcome(&outcome(ReportOutcome::Completed {
                report: report(),
                segments: 3,
                degraded_segments: 1,
            }))
            .unwrap();

        assert!(output.contains("✓ Report synthesized from 3 segment(s)"));
        assert!(output.contains("⚠ 1 segment(s) could not be analyzed"));
        assert!(output.contains("3. METHODOLOGY\nField observation"));
        assert!(output.contains("(Anonymous, n.d.)"));
    }

    #[test]
    fn test_failed_outcome_text() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter
            .format_outcome(&outcome(ReportOutcome::Failed {
                reason: "Synthesis failed: timeout".to_string(),
            }))
            .unwrap();

        assert!(output.contains("✗ No report: Synthesis failed: timeout"));
        assert!(!output.contains("GENERAL SUMMARY"));
    }

    #[test]
    fn test_metadata_summary_outcome_text() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let summary = MetadataSummary::new(
            "Probably about bees.",
            vec!["Dance".to_string(), "Forage".to_string()],
            SummarySource::Oracle,
        );
        let output = formatter
            .format_outcome(&outcome(ReportOutcome::MetadataSummary { summary }))
            .unwrap();

        assert!(output.contains("⚠ Text too short for a report; summarized from metadata"));
        assert!(output.contains("Summary\nProbably about bees."));
        assert!(output.contains("Key points\n  - Dance\n  - Forage"));
        assert!(!output.contains("Summary built locally"));
    }

    #[test]
    fn test_outcome_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_outcome(&outcome(ReportOutcome::Failed {
                reason: "too short".to_string(),
            }))
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["report"]["status"], "failed");
    }

    #[test]
    fn test_segments_table() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let segments = vec![Segment::new(0, "First part.\n\n"), Segment::new(1, "Second part.")];
        let output = formatter.format_segments(&segments).unwrap();

        assert!(output.contains("Segment"));
        assert!(output.contains("1/2"));
        assert!(output.contains("Second part."));
    }

    #[test]
    fn test_empty_segments() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter.format_segments(&[]).unwrap();
        assert!(output.contains("No segments"));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(PREVIEW_CHARS + 10);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 1);
        assert_eq!(preview("  short\nsecond line"), "short");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
