//! core
//!
//! Core domain types and configuration for deptool.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, BranchName, TagName, RefName, RepoSlug
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing

pub mod config;
pub mod types;
