//! Maps check and download results to the process exit outcome.

use std::path::PathBuf;

use booth_core::DownloadError;

use crate::ProcessExit;

/// Counts of saved and failed downloads for one `download` run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DownloadTally {
    pub(crate) saved: usize,
    pub(crate) failed: usize,
}

impl DownloadTally {
    pub(crate) fn record(&mut self, result: &Result<PathBuf, DownloadError>) {
        if result.is_ok() {
            self.saved += 1;
        } else {
            self.failed += 1;
        }
    }

    /// 0 when nothing failed, 1 when some files were saved, 2 when none were.
    pub(crate) fn exit_outcome(self) -> ProcessExit {
        match (self.saved, self.failed) {
            (_, 0) => ProcessExit::Success,
            (0, _) => ProcessExit::Failure,
            _ => ProcessExit::Partial,
        }
    }
}

/// A rejected session maps to failure. Probe errors never reach here.
pub(crate) fn session_exit_outcome(valid: bool) -> ProcessExit {
    if valid {
        ProcessExit::Success
    } else {
        ProcessExit::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(name: &str) -> Result<PathBuf, DownloadError> {
        Ok(PathBuf::from(name))
    }

    fn not_found(url: &str) -> Result<PathBuf, DownloadError> {
        Err(DownloadError::http_status(url, 404))
    }

    #[test]
    fn test_all_images_and_files_saved_is_success() {
        let mut tally = DownloadTally::default();
        tally.record(&saved("cover.png"));
        tally.record(&saved("avatar.zip"));
        assert_eq!(tally, DownloadTally { saved: 2, failed: 0 });
        assert_eq!(tally.exit_outcome(), ProcessExit::Success);
    }

    #[test]
    fn test_empty_download_run_is_success() {
        assert_eq!(DownloadTally::default().exit_outcome(), ProcessExit::Success);
    }

    #[test]
    fn test_expired_purchase_link_next_to_saved_image_is_partial() {
        let mut tally = DownloadTally::default();
        tally.record(&saved("cover.png"));
        tally.record(&not_found("https://booth.pm/downloadables/42"));
        assert_eq!(tally.exit_outcome(), ProcessExit::Partial);
        assert_eq!(tally.exit_outcome().code(), 1);
    }

    #[test]
    fn test_nothing_saved_is_failure() {
        let mut tally = DownloadTally::default();
        tally.record(&not_found("https://booth.pm/downloadables/1"));
        tally.record(&not_found("https://booth.pm/downloadables/2"));
        assert_eq!(tally.exit_outcome(), ProcessExit::Failure);
    }

    #[test]
    fn test_rejected_session_exits_with_two() {
        assert_eq!(session_exit_outcome(true), ProcessExit::Success);
        assert_eq!(session_exit_outcome(false).code(), 2);
    }
}
