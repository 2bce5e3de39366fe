//! Constants for the download module (timeouts, redirect policy).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large purchase archives).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Maximum number of redirects followed before a fetch fails.
pub const MAX_REDIRECTS: usize = 10;
