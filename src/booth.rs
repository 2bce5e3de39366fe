//! BOOTH client facade.
//!
//! [`BoothClient`] owns one authenticated [`HttpClient`] and exposes the
//! three operations callers need: a session liveness check and the two
//! download starters. Every download runs as its own Tokio task and is
//! observed through the returned [`DownloadHandle`].

use std::path::PathBuf;

use tracing::{debug, instrument};
use url::Url;

use crate::auth::{Session, SessionProbe, SessionValidator};
use crate::config::FileConfig;
use crate::download::{
    CONNECT_TIMEOUT_SECS, DownloadError, DownloadHandle, DownloadRequest, HttpClient,
    READ_TIMEOUT_SECS,
};

/// Origin the session cookies are scoped to (covers all subdomains).
pub const BOOTH_ORIGIN: &str = "https://booth.pm/";

/// Where the session cookies are sent and how liveness is probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Origin whose domain (and subdomains) receive the session cookies.
    pub cookie_origin: Url,
    /// Probe deciding whether the session is alive.
    pub session_probe: SessionProbe,
}

impl Endpoints {
    /// Creates an endpoint set.
    #[must_use]
    pub fn new(cookie_origin: Url, session_probe: SessionProbe) -> Self {
        Self {
            cookie_origin,
            session_probe,
        }
    }
}

impl Default for Endpoints {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            cookie_origin: Url::parse(BOOTH_ORIGIN).expect("BOOTH origin is valid"), // Static URL, safe to panic
            session_probe: SessionProbe::default(),
        }
    }
}

/// Authenticated BOOTH client.
///
/// Cheap to clone; clones share the connection pool and session cookies.
#[derive(Debug, Clone)]
pub struct BoothClient {
    client: HttpClient,
    validator: SessionValidator,
}

impl BoothClient {
    /// Creates a client for `booth.pm` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(session: &Session) -> Result<Self, DownloadError> {
        Self::with_endpoints(session, Endpoints::default())
    }

    /// Creates a client from a loaded config file.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    pub fn from_config(config: &FileConfig) -> Result<Self, DownloadError> {
        Self::with_endpoints_and_timeouts(
            &config.session(),
            Endpoints::default(),
            config.connect_timeout_secs(),
            config.read_timeout_secs(),
        )
    }

    /// Creates a client for custom endpoints with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    pub fn with_endpoints(session: &Session, endpoints: Endpoints) -> Result<Self, DownloadError> {
        Self::with_endpoints_and_timeouts(
            session,
            endpoints,
            CONNECT_TIMEOUT_SECS,
            READ_TIMEOUT_SECS,
        )
    }

    /// Creates a client for custom endpoints with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    #[instrument(level = "debug", skip(session, endpoints), fields(origin = %endpoints.cookie_origin))]
    pub fn with_endpoints_and_timeouts(
        session: &Session,
        endpoints: Endpoints,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = HttpClient::with_session_and_timeouts(
            session,
            &endpoints.cookie_origin,
            connect_timeout_secs,
            read_timeout_secs,
        )?;
        let validator = SessionValidator::new(client.clone(), endpoints.session_probe);
        debug!("BOOTH client ready");
        Ok(Self { client, validator })
    }

    /// Returns true iff the session is still accepted by BOOTH.
    ///
    /// Issues exactly one request; see [`SessionValidator::is_session_valid`].
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the probe request itself fails.
    pub async fn is_session_valid(&self) -> Result<bool, DownloadError> {
        self.validator.is_session_valid().await
    }

    /// Starts downloading an item image named after its asset path.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use = "the handle reports whether the download succeeded"]
    pub fn start_download_image(
        &self,
        url: impl Into<String>,
        target_dir: impl Into<PathBuf>,
    ) -> DownloadHandle {
        self.start_download(DownloadRequest::image(url, target_dir))
    }

    /// Starts downloading a purchased file named after its resolved URL.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use = "the handle reports whether the download succeeded"]
    pub fn start_download_binary(
        &self,
        url: impl Into<String>,
        target_dir: impl Into<PathBuf>,
    ) -> DownloadHandle {
        self.start_download(DownloadRequest::binary(url, target_dir))
    }

    /// Starts any download request on its own task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use = "the handle reports whether the download succeeded"]
    pub fn start_download(&self, request: DownloadRequest) -> DownloadHandle {
        debug!(url = %request.url, kind = request.kind.as_str(), "spawning download");
        DownloadHandle::spawn(self.client.clone(), request)
    }
}
