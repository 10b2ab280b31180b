//! High-level pipeline: tree listing → content fetch → index report.
//!
//! Strictly sequential. Discovery and filesystem failures end the run;
//! failures on a single file or bundle are logged and absorbed by the stage
//! that hit them.

use tracing::{error, info};

use crate::config::Config;
use crate::contract::{RepositoryHost, Summarizer};
use crate::download::{fetch_bundles, list_files};
use crate::error::ScrapeError;
use crate::report::{write_index, IndexReport};

/// Run the pipeline once. Returns `Ok(None)` when no file qualified, in
/// which case no output directory is created.
pub async fn synchronise<H, S>(
    config: &Config,
    host: &H,
    summarizer: &S,
) -> Result<Option<IndexReport>, ScrapeError>
where
    H: RepositoryHost + ?Sized,
    S: Summarizer + ?Sized,
{
    info!(source = %config.report.source_url, "[SYNC] Starting extraction");

    let entries = list_files(host, &config.repository).await.map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Discovery failed");
        ScrapeError::from(e)
    })?;

    let bundles = fetch_bundles(host, &entries, &config.repository, &config.fetch).await;
    if bundles.is_empty() {
        info!(extension = %config.repository.extension, "[SYNC] No files found, nothing to report");
        return Ok(None);
    }

    let report = write_index(
        &bundles,
        &config.report,
        &config.repository.extension,
        &config.summarizer.system_prompt,
        summarizer,
    )
    .await?;

    info!(
        output_dir = %report.output_dir.display(),
        bundles = report.records.len(),
        summarized = report.summarized(),
        failed = report.failed(),
        "[SYNC] Index complete"
    );
    Ok(Some(report))
}
