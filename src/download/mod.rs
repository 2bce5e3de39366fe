//! Authenticated fetching and downloading.
//!
//! This module provides the session-carrying HTTP client, the filename
//! strategies for item images and purchased files, and the download task
//! that ties them together.
//!
//! # Example
//!
//! ```no_run
//! use booth_core::download::{DownloadHandle, DownloadRequest, HttpClient};
//! use booth_core::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let origin = "https://booth.pm/".parse()?;
//! let client = HttpClient::with_session(&Session::new("token"), &origin)?;
//! let handle = DownloadHandle::spawn(
//!     client,
//!     DownloadRequest::binary("https://booth.pm/downloadables/123", "./downloads"),
//! );
//! let path = handle.await?;
//! println!("Downloaded: {}", path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;
mod task;

pub use client::{HttpClient, ResolvedDownload, ResolvedText};
pub use constants::{CONNECT_TIMEOUT_SECS, MAX_REDIRECTS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::{FilenameError, binary_filename, image_filename};
pub use task::{DownloadHandle, DownloadKind, DownloadRequest, run_download};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
