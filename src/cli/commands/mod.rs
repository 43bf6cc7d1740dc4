//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Turns its clap arguments into an engine request
//! 2. Calls the engine to execute it
//! 3. Formats and displays output
//!
//! Handlers never touch the repository layer directly.

mod completion;
mod listing;

pub use completion::completion;
pub use listing::{listing, resolve_format};

use anyhow::Result;

use super::args::{Cli, Command};
use super::build_context;
use crate::core::config::ConfigSearch;
use crate::engine::{load_config, ClassifyMode};
use crate::git::GitOpener;

/// Dispatch a parsed command to its handler.
///
/// Only the listing commands read the config file.
pub fn dispatch(cli: &Cli) -> Result<()> {
    let (args, mode) = match &cli.command {
        Command::Completion { shell } => return completion(*shell),
        Command::Show(args) => (args, ClassifyMode::UPSTREAM),
        Command::ShowCarries(args) => (args, ClassifyMode::CARRY),
    };

    let config = load_config(&ConfigSearch::from_env())?;
    let ctx = build_context(cli, &config)?;
    listing(&GitOpener, &ctx, &config, args, mode)
}
