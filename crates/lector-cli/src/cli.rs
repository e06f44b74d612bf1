//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use lector_domain::Language;
use std::path::PathBuf;

/// Lector - Analyze long academic documents into structured reports and citations.
#[derive(Debug, Parser)]
#[command(name = "lector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.lector/config.toml)
    #[arg(short, long, global = true, env = "LECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => OutputFormat::Text,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// Report language options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LanguageArg {
    /// English section titles
    English,
    /// Portuguese section titles
    Portuguese,
}

impl From<LanguageArg> for Language {
    fn from(language: LanguageArg) -> Self {
        match language {
            LanguageArg::English => Language::English,
            LanguageArg::Portuguese => Language::Portuguese,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline on a text file
    Analyze(AnalyzeArgs),

    /// Show how a text file would be segmented (no oracle calls)
    Segment(SegmentArgs),

    /// Resolve citations for a metadata record
    Cite(CiteArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Plain-text document to analyze
    pub file: PathBuf,

    /// Existing metadata as a JSON object
    #[arg(short, long, conflicts_with = "metadata_file")]
    pub metadata: Option<String>,

    /// File containing existing metadata as a JSON object
    #[arg(long)]
    pub metadata_file: Option<PathBuf>,

    /// Document identifier (default: file name)
    #[arg(long)]
    pub id: Option<String>,

    /// Report language (overrides the config file)
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageArg>,
}

/// Arguments for the segment command.
#[derive(Debug, Parser)]
pub struct SegmentArgs {
    /// Plain-text document to segment
    pub file: PathBuf,

    /// Maximum segment size in chars (overrides the config file)
    #[arg(short = 's', long)]
    pub max_size: Option<usize>,
}

/// Arguments for the cite command.
#[derive(Debug, Parser)]
pub struct CiteArgs {
    /// Metadata as a JSON object
    #[arg(short, long)]
    pub metadata: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "lector",
            "--format",
            "json",
            "analyze",
            "paper.txt",
            "--id",
            "doc-1",
            "--language",
            "portuguese",
        ]);

        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.file, PathBuf::from("paper.txt"));
                assert_eq!(args.id.as_deref(), Some("doc-1"));
                assert!(matches!(args.language, Some(LanguageArg::Portuguese)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_segment_max_size() {
        let cli = Cli::parse_from(["lector", "segment", "paper.txt", "--max-size", "500"]);
        match cli.command {
            Command::Segment(args) => assert_eq!(args.max_size, Some(500)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_metadata_sources_conflict() {
        let result = Cli::try_parse_from([
            "lector",
            "analyze",
            "paper.txt",
            "--metadata",
            "{}",
            "--metadata-file",
            "meta.json",
        ]);
        assert!(result.is_err());
    }
}
