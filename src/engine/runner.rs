//! engine::runner
//!
//! The single entry point for a listing: validate, fetch, classify.
//!
//! # Lifecycle
//!
//! ```text
//! Validate -> Build URL -> Open (fetch) -> Classify -> Return
//! ```
//!
//! # Invariants
//!
//! - Validation runs before the opener is touched; an invalid request never
//!   reaches the network
//! - Parameters are checked in a fixed order (repository, tag, branch) so the
//!   first missing one is the one reported
//! - Every failure is terminal and maps to exactly one [`RunError`] kind
//!
//! # Example
//!
//! ```ignore
//! use deptool::engine::runner::{run_listing, ListingRequest};
//! use deptool::engine::{ClassifyMode, Context};
//! use deptool::git::GitOpener;
//!
//! let request = ListingRequest {
//!     repository: Some("openshift/kubernetes-apimachinery".into()),
//!     upstream_tag: Some("kubernetes-1.14.0".into()),
//!     downstream_branch: Some("oc-4.2-kubernetes-1.14.0".into()),
//! };
//! let result = run_listing(&GitOpener, &Context::default(), &request, ClassifyMode::CARRY)?;
//! ```

use thiserror::Error;
use tracing::{debug, info};

use super::classify::{Classification, Classifier, ClassifyMode};
use super::Context;
use crate::core::config::{Config, ConfigError, ConfigSearch};
use crate::core::types::{BranchName, RepoSlug, TagName};
use crate::git::{GitError, RemoteOpener};

/// Errors from running a listing.
#[derive(Debug, Error)]
pub enum RunError {
    /// A required parameter is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The remote could not be fetched.
    #[error("failed to fetch repository: {0}")]
    Fetch(#[source] GitError),

    /// The tag or branch does not exist after the fetch.
    #[error("{0}")]
    RefNotFound(#[source] GitError),

    /// History could not be walked or an ancestry query failed.
    #[error("failed to walk history: {0}")]
    Traversal(#[source] GitError),

    /// The configuration file is unusable.
    #[error("failed to load configuration")]
    Config(#[from] ConfigError),
}

impl RunError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Validation(_) => "validation",
            RunError::Fetch(_) => "fetch",
            RunError::RefNotFound(_) => "ref-not-found",
            RunError::Traversal(_) => "traversal",
            RunError::Config(_) => "config",
        }
    }

    fn from_classify(err: GitError) -> Self {
        if err.is_ref_not_found() {
            RunError::RefNotFound(err)
        } else {
            RunError::Traversal(err)
        }
    }
}

/// Raw, unvalidated listing parameters as they arrive from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRequest {
    /// `owner/name`
    pub repository: Option<String>,
    pub upstream_tag: Option<String>,
    pub downstream_branch: Option<String>,
}

/// A request whose parameters have all been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub repository: RepoSlug,
    pub upstream_tag: TagName,
    pub downstream_branch: BranchName,
}

fn required<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str, RunError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RunError::Validation(format!("{} must be specified", what))),
    }
}

impl ListingRequest {
    /// Check every parameter without touching the network.
    ///
    /// # Errors
    ///
    /// [`RunError::Validation`] naming the first missing or malformed
    /// parameter, in the order repository, upstream tag, downstream branch.
    pub fn validate(&self) -> Result<ValidatedRequest, RunError> {
        let repository = required(&self.repository, "repository")?;
        let repository =
            RepoSlug::parse(repository).map_err(|e| RunError::Validation(e.to_string()))?;

        let upstream_tag = required(&self.upstream_tag, "upstream tag")?;
        let upstream_tag =
            TagName::new(upstream_tag).map_err(|e| RunError::Validation(e.to_string()))?;

        let downstream_branch = required(&self.downstream_branch, "downstream branch")?;
        let downstream_branch = BranchName::new(downstream_branch)
            .map_err(|e| RunError::Validation(e.to_string()))?;

        Ok(ValidatedRequest {
            repository,
            upstream_tag,
            downstream_branch,
        })
    }
}

/// Load the config file from the first existing location of `search`.
///
/// # Errors
///
/// [`RunError::Config`] if a config file exists but is unusable.
pub fn load_config(search: &ConfigSearch) -> Result<Config, RunError> {
    let config = Config::load_with(search)?;
    if let Some(path) = config.loaded_from() {
        debug!(path = %path.display(), "loaded config");
    }
    Ok(config)
}

/// Validate `request`, fetch the repository through `opener`, and classify
/// the downstream branch in `mode`.
///
/// # Errors
///
/// - [`RunError::Validation`] before any fetch is attempted
/// - [`RunError::Fetch`] if the opener fails
/// - [`RunError::RefNotFound`] if the tag or branch is missing
/// - [`RunError::Traversal`] for any failure while walking history
pub fn run_listing<O: RemoteOpener>(
    opener: &O,
    ctx: &Context,
    request: &ListingRequest,
    mode: ClassifyMode,
) -> Result<Classification, RunError> {
    let request = request.validate()?;
    let url = request.repository.fetch_url(&ctx.base_url);

    info!(url = %url, remote = %ctx.remote, "fetching repository");
    let history = opener.open(&url, &ctx.remote).map_err(RunError::Fetch)?;

    let classification = Classifier::new(&history)
        .with_metadata_paths(ctx.metadata_paths.clone())
        .classify(
            &ctx.remote,
            &request.upstream_tag,
            &request.downstream_branch,
            mode,
        )
        .map_err(RunError::from_classify)?;

    debug!(
        visited = classification.entries.len(),
        kept = classification.kept().count(),
        "classification finished"
    );
    Ok(classification)
}
