//! `load_config`: builds the run [`Config`] from built-in defaults, an
//! optional YAML file and the process environment.
//!
//! The YAML file never carries secrets. Credentials and endpoint overrides
//! are read from the environment only:
//! - `GITHUB_TOKEN` (optional) raises the hosting provider's rate limit
//! - `OPENAI_API_KEY` (required) authenticates the summarisation client
//! - `GITHUB_API_URL`, `OPENAI_BASE_URL`, `REALM_INDEX_ARTIFACTS_DIR` (optional)
//!
//! Callers are expected to have loaded `.env` beforehand.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::Config;

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const GITHUB_API_URL_VAR: &str = "GITHUB_API_URL";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const ARTIFACTS_DIR_VAR: &str = "REALM_INDEX_ARTIFACTS_DIR";

/// Loads the configuration, reading `path` as YAML when given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            info!("No config file given, using built-in defaults");
            Config::default()
        }
    };

    inject_env(&mut config)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path,
                e
            ));
        }
    };

    // An empty file means "all defaults".
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    match serde_yaml::from_str::<Config>(&content) {
        Ok(conf) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

fn inject_env(config: &mut Config) -> Result<()> {
    config.repository.token = non_empty_var(GITHUB_TOKEN_VAR);
    if config.repository.token.is_none() {
        info!("GITHUB_TOKEN not set, using unauthenticated requests");
    }

    config.summarizer.api_key = match non_empty_var(OPENAI_API_KEY_VAR) {
        Some(key) => key,
        None => {
            error!("OPENAI_API_KEY environment variable not set");
            anyhow::bail!("OPENAI_API_KEY environment variable not set");
        }
    };

    if let Some(url) = non_empty_var(GITHUB_API_URL_VAR) {
        config.repository.api_url = url;
    }
    if let Some(url) = non_empty_var(OPENAI_BASE_URL_VAR) {
        config.summarizer.base_url = url;
    }
    if let Some(dir) = non_empty_var(ARTIFACTS_DIR_VAR) {
        config.report.artifacts_dir = PathBuf::from(dir);
    }
    Ok(())
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
