//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lector_domain::Metadata;
use lector_pipeline::{DocumentPipeline, DocumentRequest};
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let text = fs::read_to_string(&args.file)?;
    let metadata = read_metadata(args.metadata.as_deref(), args.metadata_file.as_deref())?;
    let document_id = args.id.unwrap_or_else(|| document_id_for(&args.file));

    let mut pipeline_config = config.pipeline.clone();
    if let Some(language) = args.language {
        pipeline_config = pipeline_config.with_language(language.into());
    }

    let provider = config.build_provider()?;
    info!("Using model {} at {}", provider.model(), config.llm.base_url);

    let pipeline = DocumentPipeline::new(provider, pipeline_config)?;
    let outcome = pipeline
        .process(DocumentRequest::new(document_id, text).with_metadata(metadata))
        .await;

    println!("{}", formatter.format_outcome(&outcome)?);
    Ok(())
}

/// Existing metadata from an inline JSON object or a file; empty when neither is given
fn read_metadata(inline: Option<&str>, file: Option<&Path>) -> Result<Metadata> {
    let json = match (inline, file) {
        (Some(json), _) => json.to_string(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => return Ok(Metadata::default()),
    };

    Metadata::from_json(&json)
        .map_err(|e| CliError::InvalidInput(format!("Metadata is not a JSON object: {}", e)))
}

/// File stem of `path`, or the whole path when it has none
fn document_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
