//! git::traverse
//!
//! Lazy history walks over any [`History`].
//!
//! # Orders
//!
//! - [`TraversalOrder::DfsPost`]: a single explicit stack. Pop a commit,
//!   emit it if unseen, push its parents in parent order. The last parent
//!   therefore sits on top and its whole segment is emitted before the walk
//!   returns to the earlier parents, so commits inside a merged side branch
//!   come out before the point where that branch joins.
//! - [`TraversalOrder::DfsPre`]: pre-order walk that descends into first
//!   parents first. On linear history this is newest first.
//! - [`TraversalOrder::CommitterTime`]: newest committer time first, ties
//!   broken by OID, like a plain `git log`.
//!
//! # Invariants
//!
//! - Every reachable commit is yielded exactly once.
//! - The walk is deterministic for a fixed graph and order.
//! - After an error is yielded the iterator is exhausted.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use super::interface::GitError;
use super::traits::{CommitNode, History};
use crate::core::types::Oid;

/// Order in which a [`Traversal`] visits commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Stack walk, last parent explored first
    DfsPost,
    /// Pre-order walk, first parent explored first
    DfsPre,
    /// Newest committer time first
    CommitterTime,
}

impl TraversalOrder {
    /// Stable name used on the command line and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TraversalOrder::DfsPost => "dfs-post",
            TraversalOrder::DfsPre => "dfs-pre",
            TraversalOrder::CommitterTime => "time",
        }
    }
}

impl std::fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heap entry for the committer-time walk.
struct Dated(CommitNode);

impl PartialEq for Dated {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Dated {}

impl PartialOrd for Dated {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dated {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .time
            .cmp(&other.0.time)
            .then_with(|| self.0.oid.cmp(&other.0.oid))
    }
}

enum Frontier {
    /// DfsPost: commits waiting to be popped
    Stack(Vec<Oid>),
    /// DfsPre: the start commit, then one parent iterator per open level
    Levels {
        start: Option<Oid>,
        levels: Vec<std::vec::IntoIter<Oid>>,
    },
    /// CommitterTime: loaded commits keyed by time
    Heap(BinaryHeap<Dated>),
}

/// A lazy walk of history reachable from a start commit.
///
/// Obtained from [`History::traverse`]. Not restartable; call `traverse`
/// again to walk from scratch.
pub struct Traversal<'h, H: History + ?Sized> {
    history: &'h H,
    seen: HashSet<Oid>,
    frontier: Frontier,
    pending_error: Option<GitError>,
    done: bool,
}

impl<'h, H: History + ?Sized> Traversal<'h, H> {
    pub(crate) fn new(history: &'h H, start: Oid, order: TraversalOrder) -> Self {
        let mut seen = HashSet::new();
        let mut pending_error = None;

        let frontier = match order {
            TraversalOrder::DfsPost => Frontier::Stack(vec![start]),
            TraversalOrder::DfsPre => Frontier::Levels {
                start: Some(start),
                levels: Vec::new(),
            },
            TraversalOrder::CommitterTime => {
                let mut heap = BinaryHeap::new();
                match history.commit(&start) {
                    Ok(node) => {
                        seen.insert(start);
                        heap.push(Dated(node));
                    }
                    Err(e) => pending_error = Some(e),
                }
                Frontier::Heap(heap)
            }
        };

        Self {
            history,
            seen,
            frontier,
            pending_error,
            done: false,
        }
    }

    fn advance(&mut self) -> Option<Result<CommitNode, GitError>> {
        if let Some(e) = self.pending_error.take() {
            return Some(Err(e));
        }

        match &mut self.frontier {
            Frontier::Stack(stack) => {
                while let Some(oid) = stack.pop() {
                    if !self.seen.insert(oid.clone()) {
                        continue;
                    }
                    let node = match self.history.commit(&oid) {
                        Ok(node) => node,
                        Err(e) => return Some(Err(e)),
                    };
                    stack.extend(node.parents.iter().cloned());
                    return Some(Ok(node));
                }
                None
            }
            Frontier::Levels { start, levels } => loop {
                let oid = match start.take() {
                    Some(oid) => oid,
                    None => {
                        let level = levels.last_mut()?;
                        match level.next() {
                            Some(oid) => oid,
                            None => {
                                levels.pop();
                                continue;
                            }
                        }
                    }
                };

                if !self.seen.insert(oid.clone()) {
                    continue;
                }
                let node = match self.history.commit(&oid) {
                    Ok(node) => node,
                    Err(e) => return Some(Err(e)),
                };
                if !node.parents.is_empty() {
                    levels.push(node.parents.clone().into_iter());
                }
                return Some(Ok(node));
            },
            Frontier::Heap(heap) => {
                let Dated(node) = heap.pop()?;
                for parent in &node.parents {
                    if !self.seen.insert(parent.clone()) {
                        continue;
                    }
                    match self.history.commit(parent) {
                        Ok(parent_node) => heap.push(Dated(parent_node)),
                        Err(e) => return Some(Err(e)),
                    }
                }
                Some(Ok(node))
            }
        }
    }
}

impl<H: History + ?Sized> Iterator for Traversal<'_, H> {
    type Item = Result<CommitNode, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.advance();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}
