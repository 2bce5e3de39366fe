//! BOOTH Downloader Core Library
//!
//! This library provides the authenticated download core for the
//! booth-downloader tool: it builds a cookie-backed session for `booth.pm`,
//! checks whether that session is still alive, and downloads item images and
//! purchased files concurrently into a target directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`auth`] - Session cookies and session liveness probing
//! - [`download`] - HTTP client, filename derivation, and download tasks
//! - [`booth`] - Facade tying a session to the download operations
//! - [`config`] - JSON config file loading for callers of the core

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod booth;
pub mod config;
pub mod download;
mod user_agent;

// Re-export commonly used types
pub use auth::{
    ADULT_COOKIE_NAME, ADULT_COOKIE_VALUE, SESSION_COOKIE_NAME, Session, SessionProbe,
    SessionCookies, SessionValidator, build_session_cookies,
};
pub use booth::{BoothClient, Endpoints};
pub use config::{ConfigError, FileConfig};
pub use download::{
    DownloadError, DownloadHandle, DownloadKind, DownloadRequest, FilenameError, HttpClient,
    ResolvedDownload, ResolvedText, binary_filename, image_filename,
};
