//! show / show-carries commands - List classified commits

use anyhow::{Context as _, Result};

use crate::cli::args::ListingArgs;
use crate::core::config::Config;
use crate::engine::{run_listing, ClassifyMode, Context, ListingRequest};
use crate::git::RemoteOpener;
use crate::ui::output::{self, OutputFormat, Verbosity};

/// Flag first, then the config file, then text.
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or_else(|| OutputFormat::from_name(config.format()))
        .unwrap_or(OutputFormat::Text)
}

/// Run one listing and print the surviving commits.
pub fn listing<O: RemoteOpener>(
    opener: &O,
    ctx: &Context,
    config: &Config,
    args: &ListingArgs,
    mode: ClassifyMode,
) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let mode = match args.order {
        Some(order) => mode.with_order(order.into()),
        None => mode,
    };
    let request = ListingRequest {
        repository: args.repository.clone(),
        upstream_tag: args.upstream_tag.clone(),
        downstream_branch: args.downstream_branch.clone(),
    };

    let classification = run_listing(opener, ctx, &request, mode)?;
    output::explain(&classification, verbosity);

    let rendered = output::render_commits(classification.kept(), resolve_format(args.format, config))
        .context("failed to render output")?;
    // Printed even when quiet.
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}
