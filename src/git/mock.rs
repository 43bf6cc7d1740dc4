//! git::mock
//!
//! In-memory commit graph for deterministic testing.
//!
//! # Design
//!
//! [`MockHistory`] implements [`History`] over a hand-built DAG. Commits get
//! synthetic but stable OIDs and strictly increasing committer times, so
//! every traversal order is reproducible. [`MockOpener`] hands out clones of
//! a prepared history and records every fetch attempt, which lets tests
//! assert that validation failures never reach the network.
//!
//! # Example
//!
//! ```
//! use deptool::core::types::{BranchName, TagName};
//! use deptool::git::mock::MockHistory;
//! use deptool::git::History;
//!
//! let mut history = MockHistory::new();
//! let base = history.add_commit("Initial import", &[], &["README.md"]);
//! let fix = history.add_commit("Fix build", &[&base], &["Makefile"]);
//! history.tag("v1.0.0", &base);
//! history.remote_branch("upstream", "release-1.0", &fix);
//!
//! let tag = TagName::new("v1.0.0").unwrap();
//! assert_eq!(history.resolve_tag(&tag).unwrap(), base);
//! assert!(history.is_ancestor(&base, &fix).unwrap());
//! assert!(!history.is_ancestor(&fix, &base).unwrap());
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use super::interface::{first_line, GitError};
use super::traits::{CommitNode, FileChange, History, RemoteOpener};
use crate::core::types::{BranchName, Oid, TagName};

/// Committer time of the first synthetic commit.
const EPOCH_SECONDS: i64 = 1_550_000_000;

#[derive(Debug, Clone)]
struct MockCommit {
    node: CommitNode,
    changes: Vec<FileChange>,
}

/// Mock history for testing.
#[derive(Debug, Clone, Default)]
pub struct MockHistory {
    commits: HashMap<Oid, MockCommit>,
    tags: HashMap<String, Oid>,
    remote_branches: HashMap<(String, String), Oid>,
    /// Make every ancestry query fail (simulates a corrupt graph).
    fail_ancestry: bool,
}

impl MockHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit touching `paths` (one added line each).
    ///
    /// Pass no paths for an empty commit.
    pub fn add_commit(&mut self, message: &str, parents: &[&Oid], paths: &[&str]) -> Oid {
        let changes = paths
            .iter()
            .map(|path| FileChange {
                path: path.to_string(),
                additions: 1,
                deletions: 0,
            })
            .collect();
        self.add_commit_with_changes(message, parents, changes)
    }

    /// Add a commit with explicit per-file statistics.
    ///
    /// Entries with no changed lines are dropped, like binary files in a
    /// real repository.
    pub fn add_commit_with_changes(
        &mut self,
        message: &str,
        parents: &[&Oid],
        mut changes: Vec<FileChange>,
    ) -> Oid {
        changes.retain(|c| c.additions + c.deletions > 0);
        let seq = self.commits.len() as u64 + 1;
        let oid = synthetic_oid(seq);
        let node = CommitNode {
            oid: oid.clone(),
            parents: parents.iter().map(|p| (*p).clone()).collect(),
            summary: first_line(message).to_string(),
            message: message.to_string(),
            time: chrono::DateTime::from_timestamp(EPOCH_SECONDS + seq as i64 * 60, 0)
                .unwrap_or(chrono::DateTime::UNIX_EPOCH),
        };
        self.commits
            .insert(oid.clone(), MockCommit { node, changes });
        oid
    }

    /// Point `refs/tags/<name>` at a commit.
    pub fn tag(&mut self, name: &str, oid: &Oid) {
        self.tags.insert(name.to_string(), oid.clone());
    }

    /// Point `refs/remotes/<remote>/<name>` at a commit.
    pub fn remote_branch(&mut self, remote: &str, name: &str, oid: &Oid) {
        self.remote_branches
            .insert((remote.to_string(), name.to_string()), oid.clone());
    }

    /// Make every subsequent ancestry query fail.
    pub fn fail_ancestry(&mut self) {
        self.fail_ancestry = true;
    }

    /// Number of commits in the graph.
    fn get(&self, oid: &Oid) -> Result<&MockCommit, GitError> {
        self.commits.get(oid).ok_or_else(|| GitError::ObjectNotFound {
            oid: oid.to_string(),
        })
    }
}

/// Stable, well-spread 40-hex OID for the `seq`-th commit.
fn synthetic_oid(seq: u64) -> Oid {
    let mixed = seq.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let hex = format!("{:016x}{:016x}{:08x}", mixed, mixed.rotate_left(29), seq as u32);
    Oid::new(hex).expect("synthetic oid is 40 hex chars")
}

impl History for MockHistory {
    fn resolve_tag(&self, tag: &TagName) -> Result<Oid, GitError> {
        self.tags
            .get(tag.as_str())
            .cloned()
            .ok_or_else(|| GitError::RefNotFound {
                refname: format!("refs/tags/{}", tag),
            })
    }

    fn resolve_remote_branch(&self, remote: &str, branch: &BranchName) -> Result<Oid, GitError> {
        self.remote_branches
            .get(&(remote.to_string(), branch.as_str().to_string()))
            .cloned()
            .ok_or_else(|| GitError::RefNotFound {
                refname: format!("refs/remotes/{}/{}", remote, branch),
            })
    }

    fn commit(&self, oid: &Oid) -> Result<CommitNode, GitError> {
        Ok(self.get(oid)?.node.clone())
    }

    fn changes(&self, oid: &Oid) -> Result<Vec<FileChange>, GitError> {
        Ok(self.get(oid)?.changes.clone())
    }

    fn is_ancestor(&self, candidate: &Oid, of: &Oid) -> Result<bool, GitError> {
        if self.fail_ancestry {
            return Err(GitError::Internal {
                message: "ancestry computation failed".to_string(),
            });
        }
        if candidate == of {
            return Ok(true);
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([of.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            for parent in &self.get(&current)?.node.parents {
                if parent == candidate {
                    return Ok(true);
                }
                queue.push_back(parent.clone());
            }
        }
        Ok(false)
    }
}

/// Opener that serves a prepared [`MockHistory`] and records each fetch.
///
/// Clones share the same call log.
#[derive(Debug, Clone)]
pub struct MockOpener {
    history: MockHistory,
    fail_with: Option<String>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockOpener {
    /// Serve `history` for every URL.
    pub fn new(history: MockHistory) -> Self {
        Self {
            history,
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every fetch with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new(MockHistory::new())
        }
    }

    /// `(url, remote)` of every fetch attempted so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl RemoteOpener for MockOpener {
    type Repo = MockHistory;

    fn open(&self, url: &str, remote: &str) -> Result<MockHistory, GitError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((url.to_string(), remote.to_string()));
        }
        match &self.fail_with {
            Some(message) => Err(GitError::Fetch {
                url: url.to_string(),
                message: message.clone(),
            }),
            None => Ok(self.history.clone()),
        }
    }
}
