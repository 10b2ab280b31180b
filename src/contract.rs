//! # contract: seams between the pipeline and the outside world
//!
//! Two traits isolate every network call the pipeline makes:
//! - [`RepositoryHost`] lists a repository tree and returns raw file payloads.
//! - [`Summarizer`] turns a block of text into a short description.
//!
//! Both are annotated for `mockall` so tests can drive the pipeline
//! deterministically without a network. Real implementations live in
//! [`crate::download::GitHubClient`] and [`crate::upload::OpenAiSummarizer`].

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Deserialize;

use crate::error::{DiscoveryError, FetchError, SummarizeError};

/// Kind of a tree entry as reported by the hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule pointers and anything else the provider may add.
    #[serde(other)]
    Other,
}

/// A single path in the remote repository tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn blob(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
        }
    }
}

/// File body exactly as returned by the contents endpoint, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncodedContent {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl EncodedContent {
    pub fn base64(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            encoding: Some("base64".to_string()),
        }
    }
}

/// Read-only access to a hosted repository at a fixed branch.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Full recursive tree of the configured branch, in provider order.
    async fn list_tree(&self) -> Result<Vec<FileEntry>, DiscoveryError>;

    /// Raw payload of a single file.
    async fn fetch_content(&self, path: &str) -> Result<EncodedContent, FetchError>;
}

/// A text summarisation service.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarise `content` following the `instruction` system directive.
    async fn summarize(&self, instruction: &str, content: &str) -> Result<String, SummarizeError>;
}
