//! Session authentication for BOOTH.
//!
//! This module builds the read-only cookie store that authenticates every request and
//! the probe that decides whether a session token is still accepted.

mod session;
mod validator;

pub use session::{
    ADULT_COOKIE_NAME, ADULT_COOKIE_VALUE, SESSION_COOKIE_NAME, Session, SessionCookies, build_session_cookies,
};
pub use validator::{ACCOUNT_SETTINGS_URL, SessionProbe, SessionValidator};
