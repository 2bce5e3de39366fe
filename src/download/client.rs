//! Authenticated HTTP client for BOOTH requests.
//!
//! This module provides the `HttpClient` struct which attaches the session
//! cookies to every request, follows redirects, and reports the final
//! resolved URL alongside the response body.

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Response};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, MAX_REDIRECTS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::auth::{Session, SessionCookies, build_session_cookies};
use crate::user_agent;

/// Bytes fetched from a URL together with the URL the redirect chain ended at.
#[derive(Debug, Clone)]
pub struct ResolvedDownload {
    /// Final URL after following all redirects.
    pub final_url: Url,
    /// Raw response body.
    pub bytes: Vec<u8>,
}

/// Text fetched from a URL together with the URL the redirect chain ended at.
#[derive(Debug, Clone)]
pub struct ResolvedText {
    /// Final URL after following all redirects.
    pub final_url: Url,
    /// Response body decoded as text.
    pub text: String,
}

/// HTTP client carrying a BOOTH session.
///
/// Create one per session and reuse it: clones share the same connection
/// pool and read-only session cookies.
///
/// # Example
///
/// ```no_run
/// use booth_core::{HttpClient, Session};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let origin = "https://booth.pm/".parse()?;
/// let client = HttpClient::with_session(&Session::new("token"), &origin)?;
/// let page = client.fetch_text("https://accounts.booth.pm/settings").await?;
/// println!("ended at {}", page.final_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client whose cookie store holds `session` for `cookie_origin`.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes
    /// - Redirects: followed, at most 10
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    #[instrument(level = "debug", skip(session, cookie_origin), fields(origin = %cookie_origin))]
    pub fn with_session(session: &Session, cookie_origin: &Url) -> Result<Self, DownloadError> {
        Self::with_session_and_timeouts(
            session,
            cookie_origin,
            CONNECT_TIMEOUT_SECS,
            READ_TIMEOUT_SECS,
        )
    }

    /// Creates a session client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    #[instrument(level = "debug", skip(session, cookie_origin), fields(origin = %cookie_origin))]
    pub fn with_session_and_timeouts(
        session: &Session,
        cookie_origin: &Url,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let cookies = build_session_cookies(session, cookie_origin);
        Self::with_session_cookies_and_timeouts(cookies, connect_timeout_secs, read_timeout_secs)
    }

    /// Creates a client around prepared session cookies.
    ///
    /// Cookies are attached to matching requests based on domain and path;
    /// cookies set by responses are not kept.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    #[instrument(level = "debug", skip(cookies))]
    pub fn with_session_cookies_and_timeouts(
        cookies: Arc<SessionCookies>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = base_client_builder(cookies, connect_timeout_secs, read_timeout_secs)
            .build()
            .map_err(DownloadError::client_build)?;
        Ok(Self { client })
    }

    /// Fetches the body of `url` as bytes, following redirects.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout, redirect loop)
    /// - The server returns an error status (4xx, 5xx)
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<ResolvedDownload, DownloadError> {
        let response = self.send_get(url).await?;
        let final_url = response.url().clone();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?
            .to_vec();

        debug!(final_url = %final_url, bytes = bytes.len(), "fetch complete");
        Ok(ResolvedDownload { final_url, bytes })
    }

    /// Fetches the body of `url` as text, following redirects.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`fetch`](Self::fetch).
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_text(&self, url: &str) -> Result<ResolvedText, DownloadError> {
        let response = self.send_get(url).await?;
        let final_url = response.url().clone();

        let text = response
            .text()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        debug!(final_url = %final_url, chars = text.len(), "fetch complete");
        Ok(ResolvedText { final_url, text })
    }

    async fn send_get(&self, url: &str) -> Result<Response, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        debug!("sending request");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        if response.url().as_str() != url {
            debug!(final_url = %response.url(), "request was redirected");
        }

        Ok(response)
    }
}

fn base_client_builder(
    cookies: Arc<SessionCookies>,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .gzip(true)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .user_agent(user_agent::default_user_agent())
        .cookie_provider(cookies)
}
