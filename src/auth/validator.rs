//! Session liveness probing.
//!
//! BOOTH answers requests carrying an expired session with a redirect to its
//! login page. A session is therefore alive iff fetching a login-protected
//! page ends at the expected URL. This check is the single source of truth
//! for session liveness; downloads do not repeat it.

use tracing::{info, instrument, warn};

use crate::download::{DownloadError, HttpClient};

/// Login-protected account settings page used as the default probe.
pub const ACCOUNT_SETTINGS_URL: &str = "https://accounts.booth.pm/settings";

/// A probe endpoint and the URL a live session must resolve it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProbe {
    probe_url: String,
    expected_url: String,
}

impl SessionProbe {
    /// Creates a probe that expects `probe_url` to resolve to itself.
    pub fn new(probe_url: impl Into<String>) -> Self {
        let probe_url = probe_url.into();
        Self {
            expected_url: probe_url.clone(),
            probe_url,
        }
    }

    /// Creates a probe with a distinct expected resolved URL.
    pub fn with_expected(probe_url: impl Into<String>, expected_url: impl Into<String>) -> Self {
        Self {
            probe_url: probe_url.into(),
            expected_url: expected_url.into(),
        }
    }

    /// URL that is requested.
    #[must_use]
    pub fn probe_url(&self) -> &str {
        &self.probe_url
    }

    /// URL the redirect chain must end at for a live session.
    #[must_use]
    pub fn expected_url(&self) -> &str {
        &self.expected_url
    }

    /// Exact string comparison; no normalization beyond the transport's.
    #[must_use]
    pub fn accepts(&self, final_url: &str) -> bool {
        final_url == self.expected_url
    }
}

impl Default for SessionProbe {
    fn default() -> Self {
        Self::new(ACCOUNT_SETTINGS_URL)
    }
}

/// Checks whether the session held by an [`HttpClient`] is still accepted.
#[derive(Debug, Clone)]
pub struct SessionValidator {
    client: HttpClient,
    probe: SessionProbe,
}

impl SessionValidator {
    /// Creates a validator issuing `probe` through `client`.
    #[must_use]
    pub fn new(client: HttpClient, probe: SessionProbe) -> Self {
        Self { client, probe }
    }

    /// Issues exactly one request to the probe URL.
    ///
    /// Returns `Ok(true)` iff the final resolved URL equals the expected URL,
    /// `Ok(false)` for any redirect elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the probe itself fails (network error,
    /// timeout, error status), in which case liveness is unknown.
    #[instrument(skip(self), fields(probe = %self.probe.probe_url))]
    pub async fn is_session_valid(&self) -> Result<bool, DownloadError> {
        let page = self.client.fetch_text(&self.probe.probe_url).await?;
        let final_url = page.final_url.as_str();

        if self.probe.accepts(final_url) {
            info!("session is valid");
            Ok(true)
        } else {
            warn!(final_url = %final_url, expected = %self.probe.expected_url, "session rejected; probe was redirected");
            Ok(false)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probe_targets_account_settings() {
        let probe = SessionProbe::default();
        assert_eq!(probe.probe_url(), "https://accounts.booth.pm/settings");
        assert_eq!(probe.expected_url(), probe.probe_url());
    }

    #[test]
    fn test_probe_accepts_exact_match_only() {
        let probe = SessionProbe::default();
        assert!(probe.accepts("https://accounts.booth.pm/settings"));
        assert!(!probe.accepts("https://accounts.booth.pm/settings/"));
        assert!(!probe.accepts("https://accounts.booth.pm/users/sign_in"));
        assert!(!probe.accepts("http://accounts.booth.pm/settings"));
    }

    #[test]
    fn test_probe_with_distinct_expected_url() {
        let probe = SessionProbe::with_expected(
            "https://accounts.booth.pm/settings",
            "https://accounts.booth.pm/settings?locale=ja",
        );
        assert!(probe.accepts("https://accounts.booth.pm/settings?locale=ja"));
        assert!(!probe.accepts("https://accounts.booth.pm/settings"));
    }
}
