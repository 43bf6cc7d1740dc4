//! engine
//!
//! Turns a listing request into a classified commit list.
//!
//! # Architecture
//!
//! ```text
//! runner: Validate -> Open (fetch) -> classify: Resolve -> Traverse -> Filter
//! ```
//!
//! - [`runner`] validates caller input and owns the error mapping
//! - [`classify`] holds the partitioning algorithm, written against
//!   [`crate::git::History`] only
//!
//! # Invariants
//!
//! - Nothing here talks to `git2`; repositories come from a
//!   [`crate::git::RemoteOpener`]
//! - A classification never mutates the repository it reads

pub mod classify;
pub mod runner;

pub use classify::{
    list_carry_commits, list_upstream_commits, Classification, ClassifiedCommit, Classifier,
    ClassifyMode, Exclusion, Policy, Verdict,
};
pub use runner::{load_config, run_listing, ListingRequest, RunError, ValidatedRequest};

use crate::core::config::{Config, DEFAULT_BASE_URL, DEFAULT_METADATA_PATHS, DEFAULT_REMOTE};

/// Execution context for commands.
///
/// Global settings after defaults, config file and CLI flags are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Hosting base URL the repository slug is appended to.
    pub base_url: String,
    /// Alias the fetched remote is registered under.
    pub remote: String,
    /// Paths whose sole modification marks a carry commit as empty.
    pub metadata_paths: Vec<String>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            debug: false,
            quiet: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            metadata_paths: DEFAULT_METADATA_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl Context {
    /// Context seeded from a loaded config; flags are applied on top by the
    /// caller.
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            remote: config.remote().to_string(),
            metadata_paths: config.metadata_paths(),
            ..Self::default()
        }
    }
}
