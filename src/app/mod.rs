//! Application wiring: config, tracing, and subcommand dispatch.

mod commands;
pub(crate) mod exit_handler;
pub(crate) mod terminal;

use anyhow::{Context, Result};
use booth_core::BoothClient;
use booth_core::config::load_config;
use clap::Parser;
use tracing::debug;

use crate::ProcessExit;
use crate::cli::{Args, Command};

pub(crate) async fn run_downloader() -> Result<ProcessExit> {
    // Parse before tracing so --help works without logs.
    let args = Args::parse();

    terminal::init_tracing(terminal::resolve_default_log_level(
        args.quiet,
        args.verbose,
    ));
    debug!(?args, "CLI arguments parsed");

    let config = load_config(args.config.as_deref()).context("failed to load configuration")?;
    let client = BoothClient::from_config(&config).context("failed to build HTTP client")?;

    match &args.command {
        Command::Check => commands::run_check_command(&client, args.quiet).await,
        Command::Download {
            images,
            files,
            output_dir,
        } => {
            let output_dir = commands::resolve_output_dir(output_dir.as_deref(), &config);
            commands::run_download_command(&client, images, files, &output_dir, args.quiet).await
        }
    }
}
