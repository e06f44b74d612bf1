//! Segment command implementation.

use crate::cli::SegmentArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lector_analyzer::segment;
use std::fs;

/// Execute the segment command.
pub fn execute_segment(args: SegmentArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let max_size = args
        .max_size
        .unwrap_or(config.pipeline.analyzer.max_segment_chars);
    if max_size == 0 {
        return Err(CliError::InvalidInput(
            "Maximum segment size must be positive".to_string(),
        ));
    }

    let text = fs::read_to_string(&args.file)?;
    let segments = segment(&text, max_size);

    println!("{}", formatter.format_segments(&segments)?);
    Ok(())
}
