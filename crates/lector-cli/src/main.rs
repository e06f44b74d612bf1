//! Lector CLI - Analyze academic documents from the command line.

use anyhow::Context;
use clap::Parser;
use lector_cli::commands;
use lector_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Analyze(args) => {
            let file = args.file.display().to_string();
            commands::execute_analyze(args, &config, &formatter)
                .await
                .with_context(|| format!("Failed to analyze {}", file))?;
        }
        Command::Segment(args) => {
            commands::execute_segment(args, &config, &formatter)?;
        }
        Command::Cite(args) => {
            commands::execute_cite(args, &config, &formatter).await?;
        }
    }

    Ok(())
}
