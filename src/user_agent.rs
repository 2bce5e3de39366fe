//! User-Agent string for BOOTH requests.

/// Product token used in the User-Agent header.
const PRODUCT_NAME: &str = "booth-downloader";

/// Default User-Agent for session probes and downloads (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{PRODUCT_NAME}/{version} (personal-purchase-archiver)")
}
