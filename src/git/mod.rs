//! git
//!
//! Repository access layer.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module should import
//! `git2`. Everything above this layer talks to history through the
//! [`History`] trait and obtains repositories through a [`RemoteOpener`].
//!
//! # Responsibilities
//!
//! - Fetching a remote into a fresh, throwaway store
//! - Tag and remote-scoped branch resolution
//! - Commit loading and per-file change statistics
//! - Ancestry queries (is-ancestor)
//! - History traversal in a caller-selected order
//!
//! # Invariants
//!
//! - Nothing is ever written to the remote
//! - A store is populated by exactly one fetch and read-only afterwards
//! - All operations return strong types (Oid, TagName, BranchName)
//!
//! # Example
//!
//! ```ignore
//! use deptool::git::{GitOpener, History, RemoteOpener, TraversalOrder};
//!
//! let git = GitOpener.open("https://github.com/openshift/api", "upstream")?;
//! for commit in git.traverse(&head, TraversalOrder::DfsPost) {
//!     let commit = commit?;
//!     println!("{}: {}", commit.oid.abbrev(), commit.summary);
//! }
//! ```

mod interface;
pub mod mock;
mod traits;
mod traverse;

pub use interface::{Git, GitError, GitOpener};
pub use traits::{CommitNode, FileChange, History, RemoteOpener};
pub use traverse::{Traversal, TraversalOrder};
