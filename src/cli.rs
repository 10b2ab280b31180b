//! CLI glue for realm-index: argument parsing and the async `run` entrypoint.
//!
//! Running the binary without arguments executes the whole pipeline once
//! with built-in defaults. `--config` points at an optional YAML file that
//! overrides any non-secret setting. All pipeline logic lives in
//! [`crate::synchronise`].

use crate::download::GitHubClient;
use crate::load_config::load_config;
use crate::synchronise::synchronise;
use crate::upload::OpenAiSummarizer;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Summarise every realm directory of a hosted repository into an index file.
#[derive(Parser, Debug)]
#[clap(
    name = "realm-index",
    version,
    about = "Fetch realm sources from a hosted repository and write an LLM-summarised index"
)]
pub struct Cli {
    /// Optional YAML file overriding the built-in configuration
    #[clap(long)]
    pub config: Option<PathBuf>,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    config.trace_loaded();

    let host = GitHubClient::new(&config.repository)?;
    let summarizer = OpenAiSummarizer::new(&config.summarizer)?;

    match synchronise(&config, &host, &summarizer).await {
        Ok(Some(report)) => {
            tracing::info!(
                output_dir = %report.output_dir.display(),
                total = report.records.len(),
                "Total directories extracted"
            );
            Ok(())
        }
        Ok(None) => {
            tracing::info!(extension = %config.repository.extension, "No matching files found");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
