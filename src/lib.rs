//! deptool - Audit a downstream fork of a vendored dependency
//!
//! deptool compares a downstream-maintained branch against an upstream
//! release tag and lists either the upstream commits the branch contains or
//! the carry commits (local patches) that exist only downstream.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Validates requests and classifies history
//! - [`core`] - Domain types and configuration
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. Nothing is ever written to the remote or to a user repository
//! 2. Every commit reachable from the downstream head gets exactly one verdict
//! 3. Invalid input is rejected before any network access

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod ui;
