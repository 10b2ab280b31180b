#![doc = "realm-index: summarise the directories of a hosted repository into a plain-text index."]

//! The pipeline runs in three sequential stages:
//! 1. [`download::list_files`] lists the repository tree and keeps qualifying files
//! 2. [`download::fetch_bundles`] retrieves them and groups contents by directory
//! 3. [`report::write_index`] summarises each group and writes the index
//!
//! [`synchronise::synchronise`] chains the stages; [`cli::run`] wires in the
//! real GitHub and OpenAI clients.

pub mod cli;
pub mod config;
pub mod contract;
pub mod download;
pub mod error;
pub mod load_config;
pub mod preprocess;
pub mod report;
pub mod synchronise;
pub mod upload;

pub use cli::{run, Cli};
