//! Subcommand handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use booth_core::{BoothClient, DownloadHandle, FileConfig};
use futures_util::future::join_all;
use tracing::{info, warn};

use crate::ProcessExit;
use crate::app::exit_handler::{self, DownloadTally};

/// Probes the session once and reports the verdict.
pub(crate) async fn run_check_command(client: &BoothClient, quiet: bool) -> Result<ProcessExit> {
    let valid = client
        .is_session_valid()
        .await
        .context("session check request failed")?;

    if valid {
        if !quiet {
            println!("Session is valid.");
        }
    } else {
        eprintln!("Session is no longer valid; update the cookie in your config.");
    }
    Ok(exit_handler::session_exit_outcome(valid))
}

/// Output directory precedence: `-o`, then config `download_dir`, then `.`.
pub(crate) fn resolve_output_dir(cli_dir: Option<&Path>, config: &FileConfig) -> PathBuf {
    cli_dir
        .map(Path::to_path_buf)
        .or_else(|| config.download_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Starts every download at once and waits for all of them.
pub(crate) async fn run_download_command(
    client: &BoothClient,
    images: &[String],
    files: &[String],
    output_dir: &Path,
    quiet: bool,
) -> Result<ProcessExit> {
    if images.is_empty() && files.is_empty() {
        info!("Nothing to download. Pass --images and/or --files URLs.");
        return Ok(ProcessExit::Success);
    }
    if !output_dir.is_dir() {
        bail!(
            "output directory '{}' does not exist or is not a directory",
            output_dir.display()
        );
    }

    let handles: Vec<DownloadHandle> = images
        .iter()
        .map(|url| client.start_download_image(url.as_str(), output_dir))
        .chain(
            files
                .iter()
                .map(|url| client.start_download_binary(url.as_str(), output_dir)),
        )
        .collect();
    let labels: Vec<(String, &'static str)> = handles
        .iter()
        .map(|handle| (handle.url().to_string(), handle.kind().as_str()))
        .collect();
    info!(tasks = handles.len(), dir = %output_dir.display(), "Downloads started");

    let results = join_all(handles).await;

    let mut tally = DownloadTally::default();
    for ((url, kind), result) in labels.iter().zip(results) {
        tally.record(&result);
        match result {
            Ok(path) => {
                if !quiet {
                    println!("[ok] {kind} {url} -> {}", path.display());
                }
            }
            Err(error) => {
                warn!(url = %url, kind, error = %error, "Download failed");
                eprintln!("[failed] {kind} {url}: {error}");
            }
        }
    }

    if !quiet {
        println!("{} downloaded, {} failed", tally.saved, tally.failed);
    }
    info!(saved = tally.saved, failed = tally.failed, "Download complete");
    Ok(tally.exit_outcome())
}
