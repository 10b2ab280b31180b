//! Reporter: writes the timestamped index of summarised directory bundles.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, info};

use crate::config::ReportConfig;
use crate::contract::Summarizer;
use crate::error::ScrapeError;
use crate::preprocess::{safe_filename, sorted_bundles, BundleMap};

/// Description written in place of a summary when summarisation fails.
pub const FALLBACK_DESCRIPTION: &str = "Error extracting keywords";

const RULE_WIDTH: usize = 80;

/// One line of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub safe_filename: String,
    pub summary: Option<String>,
}

impl IndexRecord {
    /// Successful lines end with `;`, fallback lines do not.
    pub fn to_line(&self) -> String {
        match &self.summary {
            Some(summary) => format!("{} | {};", self.safe_filename, summary),
            None => format!("{} | {}", self.safe_filename, FALLBACK_DESCRIPTION),
        }
    }
}

/// What a completed run wrote.
#[derive(Debug)]
pub struct IndexReport {
    pub output_dir: PathBuf,
    pub index_path: PathBuf,
    pub records: Vec<IndexRecord>,
}

impl IndexReport {
    pub fn summarized(&self) -> usize {
        self.records.iter().filter(|r| r.summary.is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.summarized()
    }
}

/// `YYYYMMDD-HHMMSS` in local time.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d-%H%M%S").to_string()
}

pub fn output_dir_for(config: &ReportConfig, timestamp: &str) -> PathBuf {
    config
        .artifacts_dir
        .join(format!("{}_{}", config.dir_prefix, timestamp))
}

pub fn header(config: &ReportConfig, extension: &str, count: usize) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    format!(
        "Found {count} {extension} files from {label}\nSource: {url}\n{rule}\n\nFile Name | Description\n{rule}\n",
        label = config.source_label,
        url = config.source_url,
    )
}

/// Write the index for `bundles` into a fresh timestamped directory.
///
/// Each bundle is summarised in `(label, key)` order. A failed summary yields
/// a fallback line and does not stop the report; only successful calls are
/// followed by `config.delay()`. Filesystem errors abort the report.
pub async fn write_index<S>(
    bundles: &BundleMap,
    config: &ReportConfig,
    extension: &str,
    instruction: &str,
    summarizer: &S,
) -> Result<IndexReport, ScrapeError>
where
    S: Summarizer + ?Sized,
{
    let output_dir = output_dir_for(config, &timestamp());
    fs::create_dir_all(&output_dir).map_err(|e| ScrapeError::io(&output_dir, e))?;
    let index_path = output_dir.join(&config.index_file_name);
    info!(path = %index_path.display(), bundles = bundles.len(), "Writing index");

    let file = File::create(&index_path).map_err(|e| ScrapeError::io(&index_path, e))?;
    let mut out = BufWriter::new(file);
    write_str(&mut out, &index_path, &header(config, extension, bundles.len()))?;

    let mut records = Vec::with_capacity(bundles.len());
    for (key, bundle) in sorted_bundles(bundles) {
        info!(directory = %key, label = %bundle.label, "Analyzing");
        let name = safe_filename(key);

        let summary = match summarizer.summarize(instruction, &bundle.content).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!(directory = %key, error = %e, "Error processing bundle");
                None
            }
        };
        let succeeded = summary.is_some();

        let record = IndexRecord {
            safe_filename: name,
            summary,
        };
        write_str(&mut out, &index_path, &format!("{}\n", record.to_line()))?;
        out.flush().map_err(|e| ScrapeError::io(&index_path, e))?;
        records.push(record);

        if succeeded {
            tokio::time::sleep(config.delay()).await;
        }
    }

    info!(output_dir = %output_dir.display(), "Content has been written");
    Ok(IndexReport {
        output_dir,
        index_path,
        records,
    })
}

fn write_str<W: Write>(out: &mut W, path: &Path, text: &str) -> Result<(), ScrapeError> {
    out.write_all(text.as_bytes())
        .map_err(|e| ScrapeError::io(path, e))
}
