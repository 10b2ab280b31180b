//! Error taxonomy for the index pipeline.
//!
//! Each stage owns one error type so callers can decide where a failure
//! stops: discovery and I/O errors end the run, fetch and summarise errors
//! are confined to the single file or bundle they occurred on.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to list the repository tree. Fatal to the run.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("tree listing request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("tree listing {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("tree listing response could not be decoded: {0}")]
    Decode(String),
}

/// Failure to retrieve or decode a single file. Skips that file only.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("content request for {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("content request for {path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("content response for {path} could not be decoded: {message}")]
    Decode { path: String, message: String },

    #[error("{path} has no inline content")]
    MissingContent { path: String },

    #[error("{path} uses unsupported encoding '{encoding}'")]
    Encoding { path: String, encoding: String },

    #[error("{path} is not valid base64: {source}")]
    Base64 {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Utf8 {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Failure of one summarisation call. Replaced by a fallback index line.
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("summarisation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("summarisation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("summarisation service returned no choices")]
    EmptyResponse,
}

/// Top-level error for a pipeline run.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }
}
