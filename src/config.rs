use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a technical documentation analyzer. Provide a concise description of the REALM's functionality, summarizing its main purpose and key features. Do not use ; or | characters!";

/// Effective configuration for one run. Built once at startup by
/// [`crate::load_config::load_config`] and passed to every stage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub fetch: FetchConfig,
    pub report: ReportConfig,
    pub summarizer: SummarizerConfig,
}

/// Which repository to scan and which files qualify.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub base_path: String,
    pub extension: String,
    /// Paths containing this substring are never fetched.
    pub test_marker: String,
    /// Injected from `GITHUB_TOKEN`, never read from the config file.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            owner: "gnolang".to_string(),
            repo: "gno".to_string(),
            branch: "master".to_string(),
            base_path: "examples/gno.land/r".to_string(),
            extension: ".gno".to_string(),
            test_marker: "test".to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Files whose decoded text has fewer characters are skipped.
    pub min_content_len: usize,
    /// Pause after each successful retrieval.
    pub delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            min_content_len: 50,
            delay_ms: 1000,
        }
    }
}

impl FetchConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub artifacts_dir: PathBuf,
    pub dir_prefix: String,
    pub index_file_name: String,
    pub source_url: String,
    pub source_label: String,
    /// Pause after each successful summarisation.
    pub delay_ms: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("artifacts").join("realm_extractor"),
            dir_prefix: "gno_docs".to_string(),
            index_file_name: "realms_index.txt".to_string(),
            source_url: "https://gno.land/r".to_string(),
            source_label: "Gno documentation".to_string(),
            delay_ms: 500,
        }
    }
}

impl ReportConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub system_prompt: String,
    /// Injected from `OPENAI_API_KEY`, never read from the config file.
    #[serde(skip)]
    pub api_key: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.1,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            api_key: String::new(),
        }
    }
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            owner = %self.repository.owner,
            repo = %self.repository.repo,
            branch = %self.repository.branch,
            base_path = %self.repository.base_path,
            extension = %self.repository.extension,
            github_token_set = self.repository.token.is_some(),
            artifacts_dir = %self.report.artifacts_dir.display(),
            model = %self.summarizer.model,
            "Loaded Config"
        );
        debug!(
            fetch_delay_ms = self.fetch.delay_ms,
            report_delay_ms = self.report.delay_ms,
            min_content_len = self.fetch.min_content_len,
            "Config loaded (pacing)"
        );
    }
}
