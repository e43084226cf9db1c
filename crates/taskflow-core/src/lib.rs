pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod store;
pub mod task;
pub mod tasks;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;
    info!(verbose = cli.verbose, quiet = cli.quiet, "starting taskflow");

    let cfg = config::Config::load(cli.config.as_deref())?;
    let data_dir = config::resolve_data_dir(&cfg, cli.data.as_deref())
        .context("failed to resolve data directory")?;

    let store = store::Store::open(&data_dir)
        .with_context(|| format!("failed to open store at {}", data_dir.display()))?;

    let color = !cli.no_color && cfg.color_enabled();
    let mut renderer = render::Renderer::new(color);

    let command = cli.command.unwrap_or_else(cli::Command::default_list);
    commands::dispatch(&store, &mut renderer, command)?;

    info!("done");
    Ok(())
}
