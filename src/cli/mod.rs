//! cli
//!
//! Command-line interface layer for deptool.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Merge defaults, the config file and flags into an [`engine::Context`]
//! - Install the diagnostic log subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] for execution.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::core::config::schema::validate_remote;
use crate::engine;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);
    commands::dispatch(&cli)
}

/// Apply global flags on top of the config-derived context.
pub fn build_context(cli: &Cli, config: &Config) -> Result<engine::Context> {
    let mut ctx = engine::Context::from_config(config);
    ctx.debug = cli.debug;
    ctx.quiet = cli.quiet;
    if let Some(base_url) = &cli.base_url {
        ctx.base_url = base_url.clone();
    }
    if let Some(remote) = &cli.remote {
        validate_remote(remote).context("invalid --remote")?;
        ctx.remote = remote.clone();
    }
    Ok(ctx)
}

/// Diagnostics go to stderr. `--debug` forces the debug level, otherwise
/// `RUST_LOG` applies and defaults to warnings only.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("deptool=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
