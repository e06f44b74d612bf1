//! Cite command implementation.

use crate::cli::CiteArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lector_citation::CitationResolver;
use lector_domain::Metadata;

/// Execute the cite command.
pub async fn execute_cite(args: CiteArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let metadata = Metadata::from_json(&args.metadata)
        .map_err(|e| CliError::InvalidInput(format!("Metadata is not a JSON object: {}", e)))?;

    let resolver = CitationResolver::new(config.build_provider()?, config.pipeline.citation.clone());
    let citation = resolver.resolve(&metadata).await;

    println!("{}", formatter.format_citation(&citation)?);
    Ok(())
}
