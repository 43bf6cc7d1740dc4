//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to git2. The [`Git`] type
//! owns a throwaway bare repository that is populated by exactly one fetch
//! and read from afterwards through the [`History`] trait.
//!
//! # Lifecycle
//!
//! 1. [`Git::fetch`] creates an empty bare repository in a temporary
//!    directory, registers the URL as the sole remote, and fetches every
//!    branch (as `refs/remotes/<alias>/*`) and every tag.
//! 2. Reads resolve refs, load commits, diff them against their first
//!    parent, and answer ancestry queries.
//! 3. Dropping the `Git` deletes the temporary directory.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::Fetch`]: remote unreachable, authentication failed, bad URL
//! - [`GitError::RefNotFound`]: requested tag or branch does not exist
//! - [`GitError::ObjectNotFound`]: a commit is missing from the store
//! - [`GitError::Internal`]: anything else git2 reports
//!
//! # Example
//!
//! ```ignore
//! use deptool::core::types::TagName;
//! use deptool::git::{Git, History};
//!
//! let git = Git::fetch("https://github.com/openshift/api", "upstream")?;
//! let oid = git.resolve_tag(&TagName::new("v0.1.0")?)?;
//! println!("tag is at {}", oid.abbrev());
//! ```

use thiserror::Error;
use tracing::debug;

use super::traits::{CommitNode, FileChange, History, RemoteOpener};
use crate::core::types::{BranchName, Oid, RefName, TagName, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Fetching from the remote failed.
    #[error("failed to fetch {url}: {message}")]
    Fetch {
        /// The URL that was fetched
        url: String,
        /// Description of the failure
        message: String,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// The temporary object store could not be created.
    #[error("cannot create object store: {message}")]
    Storage {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    /// Whether this error means a ref lookup came up empty.
    pub fn is_ref_not_found(&self) -> bool {
        matches!(self, GitError::RefNotFound { .. })
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            other => GitError::InvalidRefName {
                message: other.to_string(),
            },
        }
    }
}

/// The first line of a commit message.
pub(crate) fn first_line(message: &str) -> &str {
    message.split('\n').next().unwrap_or("")
}

/// The Git interface.
///
/// Owns a bare repository living in a temporary directory for the duration
/// of one run. Field order matters: the repository handle is dropped before
/// the directory is removed.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
    /// URL the repository was fetched from
    url: String,
    /// Alias the remote was registered under
    remote: String,
    /// Backing storage, deleted on drop
    _store: tempfile::TempDir,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("url", &self.url)
            .field("remote", &self.remote)
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Create a fresh store and fetch all branches and tags of `url` into it.
    ///
    /// Branch heads land under `refs/remotes/<remote>/`, tags under
    /// `refs/tags/`. Nothing is returned on failure; the partially written
    /// store is removed together with the temporary directory.
    ///
    /// # Errors
    ///
    /// - [`GitError::Storage`] if the temporary repository cannot be created
    /// - [`GitError::Fetch`] if the remote is unreachable, rejects the
    ///   credentials, or the URL is malformed
    pub fn fetch(url: &str, remote: &str) -> Result<Self, GitError> {
        let store = tempfile::Builder::new()
            .prefix("deptool-")
            .tempdir()
            .map_err(|e| GitError::Storage {
                message: e.to_string(),
            })?;

        let repo = git2::Repository::init_bare(store.path()).map_err(|e| GitError::Storage {
            message: e.message().to_string(),
        })?;

        let fetch_error = |e: git2::Error| GitError::Fetch {
            url: url.to_string(),
            message: e.message().to_string(),
        };

        {
            let mut origin = repo.remote(remote, url).map_err(fetch_error)?;
            let refspecs = [
                format!("+refs/heads/*:refs/remotes/{remote}/*"),
                "+refs/tags/*:refs/tags/*".to_string(),
            ];

            let mut options = git2::FetchOptions::new();
            options.remote_callbacks(credential_callbacks(&repo));
            options.download_tags(git2::AutotagOption::All);

            debug!(url, remote, "fetching branches and tags");
            origin
                .fetch(&refspecs, Some(&mut options), None)
                .map_err(fetch_error)?;

            let stats = origin.stats();
            debug!(
                objects = stats.received_objects(),
                bytes = stats.received_bytes(),
                "fetch complete"
            );
        }

        Ok(Self {
            repo,
            url: url.to_string(),
            remote: remote.to_string(),
            _store: store,
        })
    }

    /// Resolve a fully-qualified ref to the commit it (eventually) points at.
    ///
    /// Annotated tags are peeled to their target commit.
    fn peel_ref(&self, refname: &RefName) -> Result<Oid, GitError> {
        let reference = self
            .repo
            .find_reference(refname.as_str())
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?;

        let oid = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?
            .id();

        Ok(Oid::new(oid.to_string())?)
    }

    fn find_commit(&self, oid: &Oid) -> Result<git2::Commit<'_>, GitError> {
        let git_oid =
            git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        self.repo
            .find_commit(git_oid)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))
    }
}

impl History for Git {
    fn resolve_tag(&self, tag: &TagName) -> Result<Oid, GitError> {
        self.peel_ref(&RefName::for_tag(tag))
    }

    fn resolve_remote_branch(&self, remote: &str, branch: &BranchName) -> Result<Oid, GitError> {
        self.peel_ref(&RefName::for_remote_branch(remote, branch))
    }

    fn commit(&self, oid: &Oid) -> Result<CommitNode, GitError> {
        let commit = self.find_commit(oid)?;

        let mut parents = Vec::with_capacity(commit.parent_count());
        for parent in commit.parent_ids() {
            parents.push(Oid::new(parent.to_string())?);
        }

        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let time = chrono::DateTime::from_timestamp(commit.time().seconds(), 0)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
            .with_timezone(&chrono::Utc);

        Ok(CommitNode {
            oid: oid.clone(),
            parents,
            summary: first_line(&message).to_string(),
            message,
            time,
        })
    }

    /// Diff the commit against its first parent (or the empty tree for a
    /// root commit) and report per-file line counts.
    ///
    /// Only files with at least one text hunk are reported. Binary files,
    /// mode-only changes and submodule updates produce no entry.
    fn changes(&self, oid: &Oid) -> Result<Vec<FileChange>, GitError> {
        let commit = self.find_commit(oid)?;
        let tree = commit.tree()?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut changes = Vec::with_capacity(diff.deltas().len());
        for (idx, delta) in diff.deltas().enumerate() {
            let patch = match git2::Patch::from_diff(&diff, idx)? {
                Some(patch) if patch.num_hunks() > 0 => patch,
                _ => continue,
            };
            let (_, additions, deletions) = patch.line_stats()?;

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();

            changes.push(FileChange {
                path,
                additions,
                deletions,
            });
        }

        Ok(changes)
    }

    fn is_ancestor(&self, candidate: &Oid, of: &Oid) -> Result<bool, GitError> {
        // A commit is its own ancestor
        if candidate == of {
            return Ok(true);
        }

        let candidate_oid = git2::Oid::from_str(candidate.as_str())
            .map_err(|e| GitError::from_git2(e, candidate.as_str()))?;
        let of_oid =
            git2::Oid::from_str(of.as_str()).map_err(|e| GitError::from_git2(e, of.as_str()))?;

        self.repo
            .graph_descendant_of(of_oid, candidate_oid)
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })
    }
}

/// A way of answering a credential request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CredentialKind {
    SshAgent,
    Helper,
    Default,
}

/// Which credential kinds one fetch has already offered.
///
/// Each kind is offered at most once, so a rejected credential ends the
/// fetch with an error instead of being retried forever.
#[derive(Debug, Default)]
struct CredentialAttempts {
    ssh_agent: bool,
    helper: bool,
    default: bool,
}

impl CredentialAttempts {
    /// The next untried kind that fits the request, if any.
    fn next(
        &mut self,
        allowed: git2::CredentialType,
        has_username: bool,
    ) -> Option<CredentialKind> {
        if allowed.is_ssh_key() && has_username && !self.ssh_agent {
            self.ssh_agent = true;
            return Some(CredentialKind::SshAgent);
        }
        if allowed.is_user_pass_plaintext() && !self.helper {
            self.helper = true;
            return Some(CredentialKind::Helper);
        }
        if !self.default {
            self.default = true;
            return Some(CredentialKind::Default);
        }
        None
    }
}

/// Credentials from the ssh agent or the configured credential helper.
fn credential_callbacks(repo: &git2::Repository) -> git2::RemoteCallbacks<'static> {
    let config = repo.config().ok();
    let mut attempts = CredentialAttempts::default();
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed| {
        while let Some(kind) = attempts.next(allowed, username_from_url.is_some()) {
            debug!(url, ?kind, "offering credentials");
            match kind {
                CredentialKind::SshAgent => {
                    if let Some(user) = username_from_url {
                        return git2::Cred::ssh_key_from_agent(user);
                    }
                }
                CredentialKind::Helper => {
                    if let Some(config) = &config {
                        if let Ok(cred) =
                            git2::Cred::credential_helper(config, url, username_from_url)
                        {
                            return Ok(cred);
                        }
                    }
                }
                CredentialKind::Default => return git2::Cred::default(),
            }
        }
        Err(git2::Error::from_str(&format!("authentication failed for {url}")))
    });
    callbacks
}

/// Opens remotes by fetching them into a fresh [`Git`] store.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitOpener;

impl RemoteOpener for GitOpener {
    type Repo = Git;

    fn open(&self, url: &str, remote: &str) -> Result<Git, GitError> {
        Git::fetch(url, remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod git_error {
        use super::*;

        #[test]
        fn display_formatting() {
            let err = GitError::Fetch {
                url: "https://example.invalid/a/b".to_string(),
                message: "unreachable".to_string(),
            };
            assert_eq!(
                err.to_string(),
                "failed to fetch https://example.invalid/a/b: unreachable"
            );

            let err = GitError::RefNotFound {
                refname: "refs/tags/v1".to_string(),
            };
            assert!(err.to_string().contains("refs/tags/v1"));
            assert!(err.is_ref_not_found());
        }

        #[test]
        fn from_git2_uses_context() {
            let not_found = git2::Error::new(
                git2::ErrorCode::NotFound,
                git2::ErrorClass::Reference,
                "no such ref",
            );
            assert!(matches!(
                GitError::from_git2(not_found, "refs/tags/missing"),
                GitError::RefNotFound { .. }
            ));

            let not_found = git2::Error::new(
                git2::ErrorCode::NotFound,
                git2::ErrorClass::Odb,
                "no such object",
            );
            assert!(matches!(
                GitError::from_git2(not_found, "abc123"),
                GitError::ObjectNotFound { .. }
            ));
        }

        #[test]
        fn from_type_error() {
            let err: GitError = TypeError::InvalidOid("short".into()).into();
            assert!(matches!(err, GitError::InvalidOid { .. }));

            let err: GitError = TypeError::InvalidTagName("empty".into()).into();
            assert!(matches!(err, GitError::InvalidRefName { .. }));
        }
    }

    #[test]
    fn first_line_of_message() {
        assert_eq!(first_line("Fix thing\n\nLonger body"), "Fix thing");
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn first_line_keeps_carriage_return() {
        assert_eq!(first_line("Fix thing\r\n\r\nbody"), "Fix thing\r");
    }

    mod credentials {
        use super::*;
        use git2::CredentialType;

        fn drain(allowed: CredentialType, has_username: bool) -> Vec<CredentialKind> {
            let mut attempts = CredentialAttempts::default();
            std::iter::from_fn(|| attempts.next(allowed, has_username)).collect()
        }

        #[test]
        fn ssh_key_offered_once() {
            assert_eq!(
                drain(CredentialType::SSH_KEY, true),
                vec![CredentialKind::SshAgent, CredentialKind::Default]
            );
        }

        #[test]
        fn ssh_agent_needs_username() {
            assert_eq!(
                drain(CredentialType::SSH_KEY, false),
                vec![CredentialKind::Default]
            );
        }

        #[test]
        fn helper_then_default() {
            assert_eq!(
                drain(CredentialType::USER_PASS_PLAINTEXT, false),
                vec![CredentialKind::Helper, CredentialKind::Default]
            );
        }

        #[test]
        fn rejected_credentials_are_not_retried() {
            let mut attempts = CredentialAttempts::default();
            let allowed = CredentialType::SSH_KEY | CredentialType::USER_PASS_PLAINTEXT;
            let mut offered = 0;
            while attempts.next(allowed, true).is_some() {
                offered += 1;
                assert!(offered <= 3);
            }
            assert_eq!(attempts.next(allowed, true), None);
        }
    }

    fn source_repo() -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
        let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("refs/heads/main"), &sig, &sig, "init", &tree, &[])
            .unwrap();
        dir
    }

    #[test]
    fn store_is_removed_on_drop() {
        let source = source_repo();
        let git = Git::fetch(source.path().to_str().unwrap(), "upstream").unwrap();

        let debug = format!("{:?}", git);
        assert!(debug.contains("upstream"));

        let store = git.repo.path().to_path_buf();
        assert!(store.exists());
        drop(git);
        assert!(!store.exists());
    }

    #[test]
    fn fetch_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = Git::fetch(missing.to_str().unwrap(), "upstream");
        assert!(matches!(result, Err(GitError::Fetch { .. })));
    }
}
