//! CLI entry point for booth-downloader.

use std::process::ExitCode;

use anyhow::Result;

mod app;
mod cli;

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Everything requested succeeded.
    Success,
    /// Some downloads succeeded and some failed.
    Partial,
    /// Every download failed, or the session was rejected.
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => 1,
            Self::Failure => 2,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let exit = app::run_downloader().await?;
    Ok(ExitCode::from(exit.code()))
}
