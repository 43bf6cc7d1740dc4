//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity handling and listing formats
//!
//! # Design
//!
//! All user-facing output goes through this module. Internal diagnostics use
//! `tracing` instead and never reach stdout.

pub mod output;
