//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Archive your purchased BOOTH items.
///
/// Uses your BOOTH session cookie to check the session and to download item
/// images and purchased files.
#[derive(Parser, Debug)]
#[command(name = "booth-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config.json (default: $XDG_CONFIG_HOME/booth-downloader/config.json)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check whether the configured session cookie is still accepted (exit 2 if not)
    Check,

    /// Download item images and purchased files concurrently
    Download {
        /// Item image URLs; saved under their asset filename
        #[arg(long = "images", value_name = "URL", num_args = 1..)]
        images: Vec<String>,

        /// Purchased file URLs; saved under the filename of the resolved URL
        #[arg(long = "files", value_name = "URL", num_args = 1..)]
        files: Vec<String>,

        /// Existing directory to write into (default: config download_dir, then ".")
        #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}
