//! engine::classify
//!
//! Partitions downstream history against an upstream release tag.
//!
//! # Algorithm
//!
//! One walk, parameterized by a [`ClassifyMode`]:
//!
//! 1. Resolve the upstream tag and the remote-scoped downstream branch.
//! 2. Traverse from the downstream head in the mode's order.
//! 3. For every visited commit, in this order:
//!    - ancestry: is it reachable from the upstream commit (inclusive)?
//!      [`Policy::CarryOnly`] drops those, [`Policy::UpstreamOnly`] drops
//!      everything else;
//!    - merges (more than one parent) are dropped;
//!    - commits without file changes are dropped, and so are commits whose
//!      only change is a tracking-metadata file when the mode asks for it.
//! 4. Survivors are returned in traversal order.
//!
//! Each commit gets exactly one [`Verdict`]; the first failing test decides.
//!
//! # Modes
//!
//! [`ClassifyMode::CARRY`] and [`ClassifyMode::UPSTREAM`] differ in more than
//! their policy: the carry walk is a last-parent-first stack walk and applies
//! the metadata-only rule, the upstream walk is first-parent-first and does
//! not. Both are kept as they are; see the `modes` tests.

use tracing::{debug, trace};

use crate::core::types::{BranchName, Oid, TagName};
use crate::git::{CommitNode, GitError, History, TraversalOrder};

/// Which side of the ancestry test a listing keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Keep commits that are NOT reachable from the upstream commit.
    CarryOnly,
    /// Keep commits that ARE reachable from the upstream commit.
    UpstreamOnly,
}

/// Full configuration of one classification walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyMode {
    pub policy: Policy,
    pub order: TraversalOrder,
    /// Treat a commit touching only a tracking-metadata file as empty.
    pub metadata_only_is_empty: bool,
}

impl ClassifyMode {
    /// Local patches carried on top of upstream.
    pub const CARRY: ClassifyMode = ClassifyMode {
        policy: Policy::CarryOnly,
        order: TraversalOrder::DfsPost,
        metadata_only_is_empty: true,
    };

    /// Upstream history contained in the downstream branch.
    pub const UPSTREAM: ClassifyMode = ClassifyMode {
        policy: Policy::UpstreamOnly,
        order: TraversalOrder::DfsPre,
        metadata_only_is_empty: false,
    };

    /// Same mode, different traversal order.
    pub fn with_order(self, order: TraversalOrder) -> Self {
        Self { order, ..self }
    }
}

/// Why a visited commit was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    /// Reachable from the upstream commit (carry listing).
    AlreadyUpstream,
    /// Not reachable from the upstream commit (upstream listing).
    NotUpstream,
    /// More than one parent.
    Merge,
    /// No file changes.
    Empty,
    /// Only a tracking-metadata file changed.
    MetadataOnly,
}

impl Exclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclusion::AlreadyUpstream => "already upstream",
            Exclusion::NotUpstream => "not in upstream",
            Exclusion::Merge => "merge",
            Exclusion::Empty => "empty",
            Exclusion::MetadataOnly => "metadata only",
        }
    }
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one visited commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Kept,
    Excluded(Exclusion),
}

/// A visited commit together with its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    pub commit: CommitNode,
    pub verdict: Verdict,
}

/// Every commit reachable from the downstream head, in traversal order.
#[derive(Debug, Clone)]
pub struct Classification {
    pub mode: ClassifyMode,
    pub upstream: Oid,
    pub downstream: Oid,
    pub entries: Vec<ClassifiedCommit>,
}

impl Classification {
    /// Commits that survived every filter, in traversal order.
    pub fn kept(&self) -> impl Iterator<Item = &CommitNode> {
        self.entries
            .iter()
            .filter(|e| e.verdict == Verdict::Kept)
            .map(|e| &e.commit)
    }

    /// Owned copy of the surviving commits.
    pub fn into_kept(self) -> Vec<CommitNode> {
        self.entries
            .into_iter()
            .filter(|e| e.verdict == Verdict::Kept)
            .map(|e| e.commit)
            .collect()
    }

    /// Number of commits dropped for `reason`.
    pub fn excluded_count(&self, reason: Exclusion) -> usize {
        self.entries
            .iter()
            .filter(|e| e.verdict == Verdict::Excluded(reason))
            .count()
    }
}

/// Classifies downstream history held by a [`History`].
#[derive(Debug)]
pub struct Classifier<'h, H: History + ?Sized> {
    history: &'h H,
    metadata_paths: Vec<String>,
}

impl<'h, H: History + ?Sized> Classifier<'h, H> {
    /// A classifier using the default tracking-metadata paths.
    pub fn new(history: &'h H) -> Self {
        Self {
            history,
            metadata_paths: crate::core::config::DEFAULT_METADATA_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Replace the tracking-metadata paths.
    pub fn with_metadata_paths(mut self, paths: Vec<String>) -> Self {
        self.metadata_paths = paths;
        self
    }

    /// Walk the downstream branch and assign a verdict to every commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the tag or the branch does not exist
    /// - any traversal or ancestry failure, unchanged
    pub fn classify(
        &self,
        remote: &str,
        upstream_tag: &TagName,
        downstream_branch: &BranchName,
        mode: ClassifyMode,
    ) -> Result<Classification, GitError> {
        let upstream = self.history.resolve_tag(upstream_tag)?;
        let downstream = self.history.resolve_remote_branch(remote, downstream_branch)?;
        debug!(
            upstream = %upstream,
            downstream = %downstream,
            order = %mode.order,
            "classifying history"
        );

        let mut entries = Vec::new();
        for commit in self.history.traverse(&downstream, mode.order) {
            let commit = commit?;
            let verdict = self.verdict(&commit, &upstream, mode)?;
            trace!(oid = %commit.oid, ?verdict, "visited");
            entries.push(ClassifiedCommit { commit, verdict });
        }

        Ok(Classification {
            mode,
            upstream,
            downstream,
            entries,
        })
    }

    /// The surviving commits only.
    pub fn list(
        &self,
        remote: &str,
        upstream_tag: &TagName,
        downstream_branch: &BranchName,
        mode: ClassifyMode,
    ) -> Result<Vec<CommitNode>, GitError> {
        Ok(self
            .classify(remote, upstream_tag, downstream_branch, mode)?
            .into_kept())
    }

    fn verdict(
        &self,
        commit: &CommitNode,
        upstream: &Oid,
        mode: ClassifyMode,
    ) -> Result<Verdict, GitError> {
        let in_upstream = self.history.is_ancestor(&commit.oid, upstream)?;
        match (mode.policy, in_upstream) {
            (Policy::CarryOnly, true) => {
                return Ok(Verdict::Excluded(Exclusion::AlreadyUpstream))
            }
            (Policy::UpstreamOnly, false) => {
                return Ok(Verdict::Excluded(Exclusion::NotUpstream))
            }
            _ => {}
        }

        if commit.is_merge() {
            return Ok(Verdict::Excluded(Exclusion::Merge));
        }

        let changes = self.history.changes(&commit.oid)?;
        if changes.is_empty() {
            return Ok(Verdict::Excluded(Exclusion::Empty));
        }
        // The upstream publishing bot produces commits that only rewrite the
        // dependency manifest.
        if mode.metadata_only_is_empty
            && changes.len() == 1
            && self.metadata_paths.iter().any(|p| *p == changes[0].path)
        {
            return Ok(Verdict::Excluded(Exclusion::MetadataOnly));
        }

        Ok(Verdict::Kept)
    }
}

/// Local patches on `downstream_branch` that are not part of `upstream_tag`.
pub fn list_carry_commits<H: History + ?Sized>(
    history: &H,
    remote: &str,
    upstream_tag: &TagName,
    downstream_branch: &BranchName,
) -> Result<Vec<CommitNode>, GitError> {
    Classifier::new(history).list(remote, upstream_tag, downstream_branch, ClassifyMode::CARRY)
}

/// Upstream commits (reachable from `upstream_tag`) found on `downstream_branch`.
pub fn list_upstream_commits<H: History + ?Sized>(
    history: &H,
    remote: &str,
    upstream_tag: &TagName,
    downstream_branch: &BranchName,
) -> Result<Vec<CommitNode>, GitError> {
    Classifier::new(history).list(
        remote,
        upstream_tag,
        downstream_branch,
        ClassifyMode::UPSTREAM,
    )
}
