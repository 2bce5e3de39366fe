//! Session value and its read-only cookie store.
//!
//! A [`Session`] holds the BOOTH session token. [`build_session_cookies`]
//! turns it into a read-only cookie store carrying the two cookies BOOTH
//! expects on every request: the adult-content acceptance flag and the
//! session token. `Set-Cookie` headers from responses are ignored, so the
//! session never changes after construction.

use std::fmt;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use tracing::{debug, instrument};
use url::{Host, Url};

/// Name of the adult-content acceptance cookie.
pub const ADULT_COOKIE_NAME: &str = "adult";

/// Value marking adult content as accepted.
pub const ADULT_COOKIE_VALUE: &str = "t";

/// Name of the BOOTH session cookie.
pub const SESSION_COOKIE_NAME: &str = "_plaza_session_nktz7u";

/// An authenticated BOOTH session.
///
/// Immutable after construction. The token is redacted in Debug output to
/// prevent accidental logging of credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Session token (sensitive, never log).
    token: String,
}

impl Session {
    /// Creates a session from a raw session cookie value.
    ///
    /// Surrounding whitespace (common when pasting from browser dev tools)
    /// is trimmed.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let trimmed = token.trim();
        let token = if trimmed.len() == token.len() {
            token
        } else {
            trimmed.to_string()
        };
        Self { token }
    }

    /// Returns the session token.
    ///
    /// Session tokens are sensitive; avoid logging the return value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the `(name, value)` pairs attached to every request.
    #[must_use]
    pub fn cookies(&self) -> [(&'static str, &str); 2] {
        [
            (ADULT_COOKIE_NAME, ADULT_COOKIE_VALUE),
            (SESSION_COOKIE_NAME, self.token.as_str()),
        ]
    }
}

// Custom Debug impl that redacts the token.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("adult", &ADULT_COOKIE_VALUE)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Session cookies as seen by the HTTP client.
///
/// Matching (domain, subdomain, path) is delegated to an inner [`Jar`]; cookies
/// sent back by servers are dropped.
pub struct SessionCookies {
    jar: Jar,
}

// Redacted: the jar holds the session token.
impl fmt::Debug for SessionCookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookies")
            .field("jar", &"[REDACTED]")
            .finish()
    }
}

impl CookieStore for SessionCookies {
    fn set_cookies(&self, _cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        debug!(url = %url, "ignoring Set-Cookie from response");
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

/// Builds the cookie store holding the session cookies for `origin`.
///
/// For a domain origin (e.g. `https://booth.pm/`) the cookies carry a
/// `Domain` attribute so every subdomain receives them. IP-literal origins
/// get host-only cookies.
///
/// # Returns
///
/// An `Arc<SessionCookies>` suitable for passing to `reqwest::ClientBuilder::cookie_provider()`.
#[instrument(level = "debug", skip(session), fields(origin = %origin))]
pub fn build_session_cookies(session: &Session, origin: &Url) -> Arc<SessionCookies> {
    let jar = Jar::default();
    let domain = cookie_domain(origin);

    for (name, value) in session.cookies() {
        let set_cookie = build_set_cookie_string(name, value, domain.as_deref());
        jar.add_cookie_str(&set_cookie, origin);
        debug!(name, domain = domain.as_deref().unwrap_or("<host-only>"), "loaded session cookie");
    }

    Arc::new(SessionCookies { jar })
}

/// Returns the `Domain` attribute for cookies set on `origin`, if any.
fn cookie_domain(origin: &Url) -> Option<String> {
    match origin.host()? {
        Host::Domain(domain) => Some(domain.trim_start_matches('.').to_string()),
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// Builds a `Set-Cookie` header string for one session cookie.
fn build_set_cookie_string(name: &str, value: &str, domain: Option<&str>) -> String {
    let mut parts = vec![format!("{name}={value}")];

    if let Some(domain) = domain {
        parts.push(format!("Domain={domain}"));
    }
    parts.push("Path=/".to_string());

    parts.join("; ")
}
