//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging and per-commit verdicts
//! - `--quiet` / `-q`: Minimal output
//! - `--base-url <url>`: Hosting base URL the repository slug is appended to
//! - `--remote <alias>`: Alias the fetched remote is registered under

use clap::{Args, Parser, Subcommand};

use crate::git::TraversalOrder;
use crate::ui::output::OutputFormat;

/// deptool - Audit a downstream fork of a vendored dependency
#[derive(Parser, Debug)]
#[command(name = "deptool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Hosting base URL [default: https://github.com/]
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Remote alias used for downstream branches [default: upstream]
    #[arg(long, global = true, value_name = "ALIAS")]
    pub remote: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List upstream commits present on the downstream branch
    #[command(
        name = "show",
        long_about = "List upstream commits present on the downstream branch.\n\n\
            Fetches the repository, then walks the downstream branch and prints \
            every commit that is reachable from the upstream tag. Merge commits and \
            commits without file changes are skipped.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Upstream history contained in a downstream branch
    deptool show --repository openshift/kubernetes-apimachinery \\
        --upstream-tag kubernetes-1.14.0 \\
        --downstream-branch oc-4.2-kubernetes-1.14.0

    # Same listing as JSON, newest committer time first
    deptool show --repository openshift/api --upstream-tag v1.14.0 \\
        --downstream-branch release-4.2 --format json --order time"
    )]
    Show(ListingArgs),

    /// List carry commits: downstream patches not in the upstream tag
    #[command(
        name = "show-carries",
        long_about = "List carry commits: downstream patches not in the upstream tag.\n\n\
            Fetches the repository, then walks the downstream branch and prints \
            every commit that is NOT reachable from the upstream tag. Merge commits, \
            commits without file changes and commits that only touch a tracking \
            metadata file (Godeps/Godeps.json by default) are skipped. These are \
            the patches that must be carried across the next rebase.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Patches to preserve when rebasing onto the next upstream release
    deptool show-carries --repository openshift/kubernetes-apimachinery \\
        --upstream-tag kubernetes-1.14.0 \\
        --downstream-branch oc-4.2-kubernetes-1.14.0

    # Explain why each commit was kept or skipped
    deptool --debug show-carries --repository openshift/api \\
        --upstream-tag v1.14.0 --downstream-branch release-4.2"
    )]
    ShowCarries(ListingArgs),

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for deptool commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    deptool completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    deptool completion zsh >> ~/.zshrc

    # Fish
    deptool completion fish > ~/.config/fish/completions/deptool.fish

    # PowerShell
    deptool completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parameters shared by both listings.
///
/// Required values are optional here so that a missing one surfaces as a
/// validation error from the runner rather than a clap usage error.
#[derive(Args, Debug, Clone, Default)]
pub struct ListingArgs {
    /// Repository as owner/name
    #[arg(long, value_name = "OWNER/NAME")]
    pub repository: Option<String>,

    /// Upstream release tag
    #[arg(long, value_name = "TAG")]
    pub upstream_tag: Option<String>,

    /// Downstream branch on the remote
    #[arg(long, value_name = "BRANCH")]
    pub downstream_branch: Option<String>,

    /// Output format [default: text, or the config file's `format`]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Override the traversal order
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
}

/// Traversal order as spelled on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Last parent's segment first
    DfsPost,
    /// First parent first
    DfsPre,
    /// Newest committer time first
    Time,
}

impl From<OrderArg> for TraversalOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::DfsPost => TraversalOrder::DfsPost,
            OrderArg::DfsPre => TraversalOrder::DfsPre,
            OrderArg::Time => TraversalOrder::CommitterTime,
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
