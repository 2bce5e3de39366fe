//! Configuration file loading.
//!
//! The config file is JSON; only `cookie` is required:
//!
//! ```json
//! {
//!   "cookie": "<value of the _plaza_session_nktz7u cookie>",
//!   "download_dir": "/home/me/booth",
//!   "connect_timeout_secs": 30,
//!   "read_timeout_secs": 300
//! }
//! ```
//!
//! The `BOOTH_COOKIE` environment variable overrides the file's cookie and
//! is sufficient on its own when no config file exists.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::Session;
use crate::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Directory name under the user config directory.
pub const CONFIG_DIR_NAME: &str = "booth-downloader";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding the configured session cookie.
pub const COOKIE_ENV_VAR: &str = "BOOTH_COOKIE";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`FileConfig`].
    #[error("failed to parse config from {origin}: {source}")]
    Parse {
        /// Where the config came from (path or `<inline>`).
        origin: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A config value is out of range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// No config file exists and no cookie was supplied by the environment.
    #[error("no config file at '{}' and BOOTH_COOKIE is not set", .path.display())]
    NotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("cannot determine config directory: neither XDG_CONFIG_HOME nor HOME is set")]
    NoConfigDir,
}

/// JSON-backed configuration.
///
/// The cookie is redacted in Debug output.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    cookie: String,
    /// Default directory downloads are written into.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// HTTP connect timeout in seconds.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// HTTP read timeout in seconds.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
}

impl fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileConfig")
            .field("cookie", &"[REDACTED]")
            .field("download_dir", &self.download_dir)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}

impl FileConfig {
    /// Creates a config holding only a cookie.
    #[must_use]
    pub fn from_cookie(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            download_dir: None,
            connect_timeout_secs: None,
            read_timeout_secs: None,
        }
    }

    /// Parses and validates a config from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown keys, and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn parse_str(raw: &str) -> Result<Self, ConfigError> {
        Self::parse_with_origin(raw, "<inline>")
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// same errors as [`parse_str`](Self::parse_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_with_origin(&raw, &path.display().to_string())
    }

    fn parse_with_origin(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty cookie or a timeout
    /// outside `1..=3600`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cookie.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "cookie",
                reason: "must not be empty".to_string(),
            });
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }

    /// Replaces the cookie when `cookie` is a non-empty override.
    #[must_use]
    pub fn with_cookie_override(mut self, cookie: Option<String>) -> Self {
        if let Some(cookie) = cookie.filter(|c| !c.trim().is_empty()) {
            self.cookie = cookie;
        }
        self
    }

    /// Returns the configured session cookie value.
    ///
    /// Cookie values are sensitive; avoid logging the return value.
    #[must_use]
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Builds the session carried by every request.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(self.cookie.as_str())
    }

    /// Connect timeout, falling back to the client default.
    #[must_use]
    pub fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS)
    }

    /// Read timeout, falling back to the client default.
    #[must_use]
    pub fn read_timeout_secs(&self) -> u64 {
        self.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS)
    }
}

fn validate_timeout_secs(field: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside the expected range 1..=3600"),
        });
    }
    Ok(())
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/booth-downloader/config.json`
/// 2. `$HOME/.config/booth-downloader/config.json`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit_path` or the default path, applying the
/// `BOOTH_COOKIE` override.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config(explicit_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => resolve_default_config_path().ok_or(ConfigError::NoConfigDir)?,
    };
    load_config_from(&path, env::var(COOKIE_ENV_VAR).ok())
}

/// Loads config from `path`, letting `env_cookie` override the file's cookie.
///
/// A missing file is only acceptable when `env_cookie` supplies the cookie.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file is missing and no cookie
/// override is present, or any error from [`FileConfig::load`].
pub fn load_config_from(path: &Path, env_cookie: Option<String>) -> Result<FileConfig, ConfigError> {
    let env_cookie = env_cookie.filter(|c| !c.trim().is_empty());

    if !path.exists() {
        let Some(cookie) = env_cookie else {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        };
        debug!(path = %path.display(), "no config file; using cookie from environment");
        return Ok(FileConfig::from_cookie(cookie));
    }

    let overridden = env_cookie.is_some();
    let config = FileConfig::load(path)?.with_cookie_override(env_cookie);
    info!(path = %path.display(), cookie_from_env = overridden, "Loaded config");
    Ok(config)
}
