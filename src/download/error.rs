//! Error types for the download module.
//!
//! This module defines structured errors for all fetch and download
//! operations, carrying the URL or path that failed.

use std::path::PathBuf;

use thiserror::Error;

use super::filename::FilenameError;

/// Errors that can occur while fetching or downloading.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed to fetch.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The redirect chain looped or exceeded the redirect limit.
    #[error("redirect error fetching {url}: {source}")]
    Redirect {
        /// The URL whose redirect chain failed.
        url: String,
        /// The underlying redirect error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// No save filename could be derived for a download.
    #[error("cannot derive filename for {url}: {source}")]
    Filename {
        /// The URL the filename was derived from.
        url: String,
        /// Why derivation failed.
        #[source]
        source: FilenameError,
    },

    /// File system error while writing a download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The spawned download task panicked or was aborted.
    #[error("download task for {url} did not complete: {source}")]
    TaskFailed {
        /// The source URL of the task.
        url: String,
        /// The join error reported by the runtime.
        #[source]
        source: tokio::task::JoinError,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Classifies a transport error into timeout, redirect, or network.
    pub fn from_transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::timeout(url)
        } else if source.is_redirect() {
            Self::Redirect { url, source }
        } else {
            Self::network(url, source)
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a client construction error.
    pub fn client_build(source: reqwest::Error) -> Self {
        Self::ClientBuild { source }
    }

    /// Creates a filename derivation error.
    pub fn filename(url: impl Into<String>, source: FilenameError) -> Self {
        Self::Filename {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a task failure error.
    pub fn task_failed(url: impl Into<String>, source: tokio::task::JoinError) -> Self {
        Self::TaskFailed {
            url: url.into(),
            source,
        }
    }
}

// Note on From trait implementations:
// `From<reqwest::Error>` and `From<std::io::Error>` are not implemented because
// every variant needs context (url, path) the source errors don't carry. Use the
// constructor helpers instead.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_timeout_display() {
        let error = DownloadError::timeout("https://booth.pm/downloadables/1");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://booth.pm/downloadables/1"));
    }

    #[test]
    fn test_download_error_http_status_display() {
        let error = DownloadError::http_status("https://booth.pm/downloadables/1", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://booth.pm/downloadables/1"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_download_error_io_display_includes_path() {
        let error = DownloadError::io(
            "/tmp/missing/photo.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );
        let msg = error.to_string();
        assert!(msg.contains("/tmp/missing/photo.png"), "Expected path in: {msg}");
        assert!(msg.contains("no such directory"));
    }

    #[test]
    fn test_download_error_filename_keeps_source() {
        let error = DownloadError::filename(
            "https://booth.pm/items/1",
            FilenameError::NoAssetPath {
                url: "https://booth.pm/items/1".to_string(),
            },
        );
        assert!(error.to_string().contains("cannot derive filename"));
        let source = std::error::Error::source(&error).unwrap();
        assert!(source.to_string().contains("asset path"));
    }

    #[test]
    fn test_download_error_invalid_url_display() {
        let error = DownloadError::invalid_url("not a url");
        assert_eq!(error.to_string(), "invalid URL: not a url");
    }
}
