//! git::traits
//!
//! The repository capability the classifier is written against.
//!
//! # Design
//!
//! [`History`] is the narrow, read-only contract over a fetched commit
//! graph: resolve a tag, resolve a remote-scoped branch head, load a commit,
//! load its file changes, and answer ancestry queries. Traversal is provided
//! on top of those primitives, so every implementation walks history the
//! same way.
//!
//! [`RemoteOpener`] is the seam in front of the network. The runner only
//! ever obtains a `History` through an opener, which lets tests observe
//! whether a fetch was attempted at all.
//!
//! Implementations:
//! - [`crate::git::Git`] - git2-backed, fetched from a real remote
//! - [`crate::git::mock::MockHistory`] - in-memory graph for tests

use serde::Serialize;

use super::interface::GitError;
use super::traverse::{Traversal, TraversalOrder};
use crate::core::types::{BranchName, Oid, TagName};

/// A commit as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitNode {
    /// The commit OID
    pub oid: Oid,
    /// Parent OIDs in order (empty for a root commit)
    pub parents: Vec<Oid>,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message
    pub message: String,
    /// Committer timestamp
    pub time: chrono::DateTime<chrono::Utc>,
}

impl CommitNode {
    /// More than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// No parents at all.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Line statistics for one file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Repository-relative path
    pub path: String,
    /// Lines added
    pub additions: usize,
    /// Lines removed
    pub deletions: usize,
}

/// Read-only access to a fetched commit graph.
pub trait History {
    /// Resolve `refs/tags/<tag>`, peeling annotated tags to their commit.
    ///
    /// # Errors
    ///
    /// [`GitError::RefNotFound`] if the tag does not exist.
    fn resolve_tag(&self, tag: &TagName) -> Result<Oid, GitError>;

    /// Resolve `refs/remotes/<remote>/<branch>`.
    ///
    /// Lookup never falls back to a local branch of the same name.
    ///
    /// # Errors
    ///
    /// [`GitError::RefNotFound`] if the branch does not exist on that remote.
    fn resolve_remote_branch(&self, remote: &str, branch: &BranchName) -> Result<Oid, GitError>;

    /// Load a commit.
    fn commit(&self, oid: &Oid) -> Result<CommitNode, GitError>;

    /// File-level change statistics of a commit against its first parent.
    ///
    /// Only files with changed text lines are listed; binary files, mode
    /// changes and submodule updates are left out.
    fn changes(&self, oid: &Oid) -> Result<Vec<FileChange>, GitError>;

    /// True iff `candidate` is reachable from `of` by following parent
    /// edges. A commit is its own ancestor.
    fn is_ancestor(&self, candidate: &Oid, of: &Oid) -> Result<bool, GitError>;

    /// Walk history reachable from `start`, visiting each commit once.
    fn traverse(&self, start: &Oid, order: TraversalOrder) -> Traversal<'_, Self> {
        Traversal::new(self, start.clone(), order)
    }
}

/// Produces a [`History`] for a remote URL.
pub trait RemoteOpener {
    /// The repository type handed back after a successful fetch.
    type Repo: History;

    /// Fetch all branches and tags of `url`, registered under `remote`.
    ///
    /// # Errors
    ///
    /// [`GitError::Fetch`] when the remote cannot be fetched. No repository
    /// is returned in that case.
    fn open(&self, url: &str, remote: &str) -> Result<Self::Repo, GitError>;
}
