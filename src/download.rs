//! Discovery and retrieval against the repository host.
//!
//! [`list_files`] is the tree lister: one listing call, then a local filter.
//! [`fetch_bundles`] is the content fetcher: one call per surviving file,
//! each failure confined to its own file.
//! [`GitHubClient`] is the [`RepositoryHost`] used outside of tests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::{FetchConfig, RepositoryConfig};
use crate::contract::{EncodedContent, EntryKind, FileEntry, RepositoryHost};
use crate::error::{DiscoveryError, FetchError, ScrapeError};
use crate::preprocess::{add_to_bundle, relative_dir, BundleMap};

const USER_AGENT: &str = concat!("realm-index/", env!("CARGO_PKG_VERSION"));

/// GitHub REST client bound to one repository and branch.
pub struct GitHubClient {
    http: Client,
    api_url: String,
    owner: String,
    repo: String,
    branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeListing {
    tree: Vec<FileEntry>,
    #[serde(default)]
    truncated: bool,
}

impl GitHubClient {
    pub fn new(config: &RepositoryConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ScrapeError::Config(format!("GITHUB_TOKEN is not a valid header: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to build HTTP client: {e}")))?;

        info!(
            owner = %config.owner,
            repo = %config.repo,
            branch = %config.branch,
            authenticated = config.token.is_some(),
            "Initialized GitHubClient"
        );
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
        })
    }

    fn tree_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_url, self.owner, self.repo, self.branch
        )
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl RepositoryHost for GitHubClient {
    async fn list_tree(&self) -> Result<Vec<FileEntry>, DiscoveryError> {
        let url = self.tree_url();
        info!(url = %url, "Fetching repository structure");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| DiscoveryError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "Tree listing returned error status");
            return Err(DiscoveryError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let listing: TreeListing = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Decode(e.to_string()))?;
        if listing.truncated {
            warn!(
                entries = listing.tree.len(),
                "Tree listing was truncated by the provider, continuing with partial tree"
            );
        }
        Ok(listing.tree)
    }

    async fn fetch_content(&self, path: &str) -> Result<EncodedContent, FetchError> {
        let url = self.contents_url(path);
        debug!(url = %url, "Fetching file content");

        let response = self
            .http
            .get(&url)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<EncodedContent>()
            .await
            .map_err(|e| FetchError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

/// Whether `entry` is a qualifying source file under `repo`'s filter.
pub fn is_candidate(entry: &FileEntry, repo: &RepositoryConfig) -> bool {
    entry.kind == EntryKind::Blob
        && entry.path.starts_with(&repo.base_path)
        && entry.path.ends_with(&repo.extension)
}

/// Keep blobs under the base path with the configured extension, then drop
/// anything whose path contains the test marker.
pub fn filter_entries(entries: Vec<FileEntry>, repo: &RepositoryConfig) -> Vec<FileEntry> {
    let candidates: Vec<FileEntry> = entries
        .into_iter()
        .filter(|entry| is_candidate(entry, repo))
        .collect();
    info!(
        count = candidates.len(),
        extension = %repo.extension,
        "Found matching files in repository"
    );

    let kept: Vec<FileEntry> = candidates
        .into_iter()
        .filter(|entry| !entry.path.contains(&repo.test_marker))
        .collect();
    info!(count = kept.len(), marker = %repo.test_marker, "Files left after removing test files");
    kept
}

/// Tree lister: list the branch once and filter it. Any listing failure is
/// returned as is; an empty result is not an error.
pub async fn list_files<H>(host: &H, repo: &RepositoryConfig) -> Result<Vec<FileEntry>, DiscoveryError>
where
    H: RepositoryHost + ?Sized,
{
    let entries = host.list_tree().await.map_err(|e| {
        error!(error = %e, "Error accessing repository host");
        e
    })?;
    debug!(entries = entries.len(), "Received tree listing");
    Ok(filter_entries(entries, repo))
}

/// Decode a contents payload into UTF-8 text.
pub fn decode_content(path: &str, payload: &EncodedContent) -> Result<String, FetchError> {
    let raw = payload
        .content
        .as_deref()
        .ok_or_else(|| FetchError::MissingContent {
            path: path.to_string(),
        })?;

    match payload.encoding.as_deref() {
        None | Some("base64") => {}
        Some(other) => {
            return Err(FetchError::Encoding {
                path: path.to_string(),
                encoding: other.to_string(),
            })
        }
    }

    // The provider wraps base64 bodies at 60 columns.
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|source| FetchError::Base64 {
            path: path.to_string(),
            source,
        })?;
    String::from_utf8(bytes).map_err(|source| FetchError::Utf8 {
        path: path.to_string(),
        source,
    })
}

/// Content fetcher: retrieve every entry and group qualifying bodies by
/// their directory relative to the base path.
///
/// A failed or undecodable file is logged and skipped. Files shorter than
/// `fetch.min_content_len` characters are skipped. A successful retrieval is
/// followed by `fetch.delay()`.
pub async fn fetch_bundles<H>(
    host: &H,
    entries: &[FileEntry],
    repo: &RepositoryConfig,
    fetch: &FetchConfig,
) -> BundleMap
where
    H: RepositoryHost + ?Sized,
{
    let mut bundles = BundleMap::new();

    for entry in entries {
        let content = match host
            .fetch_content(&entry.path)
            .await
            .and_then(|payload| decode_content(&entry.path, &payload))
        {
            Ok(content) => content,
            Err(e) => {
                error!(path = %entry.path, error = %e, "Error retrieving file, skipping");
                continue;
            }
        };

        let len = content.chars().count();
        if len < fetch.min_content_len {
            info!(
                path = %entry.path,
                len,
                min = fetch.min_content_len,
                "Skipping file (below minimum length)"
            );
            continue;
        }

        let key = relative_dir(&entry.path, &repo.base_path);
        add_to_bundle(&mut bundles, &key, &content);
        info!(path = %entry.path, directory = %key, "Retrieved");

        tokio::time::sleep(fetch.delay()).await;
    }

    info!(bundles = bundles.len(), "Got directory bundles");
    bundles
}
