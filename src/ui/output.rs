//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Listings go to stdout, either as `<short-hash>: <summary>` lines or as a
//! JSON array. Diagnostics go to stderr.

use std::fmt::Display;

use serde::Serialize;

use crate::engine::{Classification, Verdict};
use crate::git::CommitNode;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Listing format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `<short-hash>: <summary>` per line
    Text,
    /// JSON array of commit records
    Json,
}

impl OutputFormat {
    /// Parse a config-file format name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// One listed commit in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub hash: String,
    pub short: String,
    pub summary: String,
    pub parents: Vec<String>,
    /// RFC 3339 committer time
    pub time: String,
}

impl From<&CommitNode> for CommitRecord {
    fn from(commit: &CommitNode) -> Self {
        Self {
            hash: commit.oid.to_string(),
            short: commit.oid.abbrev().to_string(),
            summary: commit.summary.clone(),
            parents: commit.parents.iter().map(|p| p.to_string()).collect(),
            time: commit.time.to_rfc3339(),
        }
    }
}

/// Format one commit as a text listing line.
pub fn format_commit_line(commit: &CommitNode) -> String {
    format!("{}: {}", commit.oid.abbrev(), commit.summary)
}

/// Render a commit list in `format`.
///
/// Text output has no trailing newline; an empty list renders as an empty
/// string (text) or `[]` (JSON).
pub fn render_commits<'a>(
    commits: impl IntoIterator<Item = &'a CommitNode>,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(commits
            .into_iter()
            .map(format_commit_line)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            let records: Vec<CommitRecord> = commits.into_iter().map(CommitRecord::from).collect();
            serde_json::to_string_pretty(&records)
        }
    }
}

/// Explain every verdict of a classification (debug mode only).
pub fn explain(classification: &Classification, verbosity: Verbosity) {
    if verbosity != Verbosity::Debug {
        return;
    }
    debug(
        format!(
            "upstream {} / downstream {} ({})",
            classification.upstream.abbrev(),
            classification.downstream.abbrev(),
            classification.mode.order
        ),
        verbosity,
    );
    for entry in &classification.entries {
        let verdict = match entry.verdict {
            Verdict::Kept => "kept".to_string(),
            Verdict::Excluded(reason) => format!("skipped ({})", reason),
        };
        debug(
            format!("{} {}", verdict, format_commit_line(&entry.commit)),
            verbosity,
        );
    }
}
