//! # Sync Configuration Module
//!
//! Provides configuration management for the media sync engine.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `SyncConfig`
//! instance holding every setting a run needs. It enforces fail-fast
//! validation: a run never starts with a half-specified configuration.
//!
//! ## Environment
//!
//! Hosts normally load the configuration from the process environment:
//!
//! | Variable | Setting | Default |
//! |----------|---------|---------|
//! | `GIT_REPO` | repository URL | required |
//! | `WP_URL` | site root, API base is `<WP_URL>/wp-json/` | required |
//! | `WP_USER` | API user name | required |
//! | `WP_PASSWD` | API password | required |
//! | `SYNC_CLONE_PATH` | working clone directory | `repo` |
//! | `SYNC_MARKER` | path marker of image assets | `_images` |
//! | `SYNC_MAX_CONCURRENT_UPLOADS` | upload cap | unbounded |
//! | `SYNC_LENIENT_LISTING` | treat listing errors as end of data | `false` |
//! | `SYNC_HTTP_TIMEOUT_SECS` | per-request timeout | none |
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::SyncConfig;
//!
//! let config = SyncConfig::from_env()?;
//!
//! let config = SyncConfig::builder()
//!     .repository_url("https://example.com/site.git")
//!     .site_url("https://blog.example.com")
//!     .credentials("editor", "app-password")
//!     .max_concurrent_uploads(8)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_url_credentials;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_REPOSITORY_URL: &str = "GIT_REPO";
pub const ENV_SITE_URL: &str = "WP_URL";
pub const ENV_USERNAME: &str = "WP_USER";
pub const ENV_PASSWORD: &str = "WP_PASSWD";
pub const ENV_CLONE_PATH: &str = "SYNC_CLONE_PATH";
pub const ENV_MARKER: &str = "SYNC_MARKER";
pub const ENV_MAX_CONCURRENT_UPLOADS: &str = "SYNC_MAX_CONCURRENT_UPLOADS";
pub const ENV_LENIENT_LISTING: &str = "SYNC_LENIENT_LISTING";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "SYNC_HTTP_TIMEOUT_SECS";

/// Default directory of the working clone
pub const DEFAULT_CLONE_PATH: &str = "repo";

/// Default path marker selecting image assets
pub const DEFAULT_MARKER: &str = "_images";

/// Configuration of one sync run.
///
/// Use [`SyncConfigBuilder`] or [`SyncConfig::from_env`] to construct
/// instances.
#[derive(Clone)]
pub struct SyncConfig {
    /// URL of the content repository
    pub repository_url: String,

    /// Directory holding the working clone
    pub clone_path: PathBuf,

    /// Site root of the media backend, without trailing slash
    pub site_url: String,

    /// API user name
    pub username: String,

    /// API password
    pub password: String,

    /// Substring a path must contain to be an image asset
    pub marker: String,

    /// Maximum simultaneous uploads; `None` means unbounded
    pub max_concurrent_uploads: Option<usize>,

    /// Treat a failing listing page as the end of the remote inventory
    pub lenient_listing: bool,

    /// Timeout applied to every HTTP request; `None` lets requests run
    /// until the server answers
    pub http_timeout: Option<Duration>,
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("repository_url", &redact_url_credentials(&self.repository_url))
            .field("clone_path", &self.clone_path)
            .field("site_url", &self.site_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("marker", &self.marker)
            .field("max_concurrent_uploads", &self.max_concurrent_uploads)
            .field("lenient_listing", &self.lenient_listing)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut builder = SyncConfig::builder();

        if let Some(url) = get(ENV_REPOSITORY_URL) {
            builder = builder.repository_url(url);
        }
        if let Some(url) = get(ENV_SITE_URL) {
            builder = builder.site_url(url);
        }
        builder.username = get(ENV_USERNAME);
        builder.password = get(ENV_PASSWORD);

        if let Some(path) = get(ENV_CLONE_PATH) {
            builder = builder.clone_path(path);
        }
        if let Some(marker) = get(ENV_MARKER) {
            builder = builder.marker(marker);
        }
        if let Some(value) = get(ENV_MAX_CONCURRENT_UPLOADS) {
            builder = builder.max_concurrent_uploads(parse_setting(
                ENV_MAX_CONCURRENT_UPLOADS,
                &value,
            )?);
        }
        if let Some(value) = get(ENV_LENIENT_LISTING) {
            builder = builder.lenient_listing(parse_flag(ENV_LENIENT_LISTING, &value)?);
        }
        if let Some(value) = get(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = parse_setting(ENV_HTTP_TIMEOUT_SECS, &value)?;
            builder = builder.http_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// REST API root of the media backend (`<site>/wp-json/`)
    pub fn api_base_url(&self) -> String {
        format!("{}/wp-json/", self.site_url)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Repository URL, site URL and credentials are not empty
    /// - The site URL is an http(s) URL
    /// - Clone path and marker are not empty
    /// - The upload cap, when set, is greater than 0
    /// - The HTTP timeout, when set, is greater than 0
    pub fn validate(&self) -> Result<()> {
        if self.repository_url.trim().is_empty() {
            return Err(missing(ENV_REPOSITORY_URL, "repository URL cannot be empty"));
        }

        if !(self.site_url.starts_with("http://") || self.site_url.starts_with("https://")) {
            return Err(Error::InvalidSetting {
                name: ENV_SITE_URL.to_string(),
                message: format!("expected an http(s) URL, got {:?}", self.site_url),
            });
        }

        if self.username.is_empty() || self.password.is_empty() {
            return Err(Error::Config(format!(
                "API credentials cannot be empty. Set {} and {}.",
                ENV_USERNAME, ENV_PASSWORD
            )));
        }

        if self.clone_path.as_os_str().is_empty() {
            return Err(Error::Config("Clone path cannot be empty".to_string()));
        }

        if self.marker.is_empty() {
            return Err(Error::Config("Asset marker cannot be empty".to_string()));
        }

        if self.max_concurrent_uploads == Some(0) {
            return Err(Error::InvalidSetting {
                name: ENV_MAX_CONCURRENT_UPLOADS.to_string(),
                message: "must be greater than 0 (unset it for no limit)".to_string(),
            });
        }

        if self.http_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(Error::InvalidSetting {
                name: ENV_HTTP_TIMEOUT_SECS.to_string(),
                message: "must be greater than 0 (unset it for no timeout)".to_string(),
            });
        }

        Ok(())
    }
}

fn missing(name: &str, message: &str) -> Error {
    Error::MissingSetting {
        name: name.to_string(),
        message: message.to_string(),
    }
}

fn parse_setting<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| Error::InvalidSetting {
        name: name.to_string(),
        message: e.to_string(),
    })
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::InvalidSetting {
            name: name.to_string(),
            message: format!("expected a boolean, got {:?}", other),
        }),
    }
}

/// Builder for [`SyncConfig`].
#[derive(Default)]
pub struct SyncConfigBuilder {
    repository_url: Option<String>,
    clone_path: Option<PathBuf>,
    site_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    marker: Option<String>,
    max_concurrent_uploads: Option<usize>,
    lenient_listing: bool,
    http_timeout: Option<Duration>,
}

impl SyncConfigBuilder {
    /// Sets the URL of the content repository (required).
    pub fn repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }

    /// Sets the directory of the working clone. Defaults to `repo`.
    pub fn clone_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.clone_path = Some(path.into());
        self
    }

    /// Sets the site root of the media backend (required).
    ///
    /// Trailing slashes are dropped.
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.site_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Sets the API credentials (required).
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the path marker. Defaults to `_images`.
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Caps the number of simultaneous uploads.
    pub fn max_concurrent_uploads(mut self, limit: usize) -> Self {
        self.max_concurrent_uploads = Some(limit);
        self
    }

    /// Treat listing failures as the end of the remote inventory.
    pub fn lenient_listing(mut self, lenient: bool) -> Self {
        self.lenient_listing = lenient;
        self
    }

    /// Sets the per-request HTTP timeout. Requests have none by default.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Builds the final `SyncConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(SyncConfig)` on success, or an error if a required setting
    /// is missing or a value is invalid.
    pub fn build(self) -> Result<SyncConfig> {
        let repository_url = self
            .repository_url
            .ok_or_else(|| missing(ENV_REPOSITORY_URL, "repository URL is required"))?;

        let site_url = self
            .site_url
            .ok_or_else(|| missing(ENV_SITE_URL, "site URL is required"))?;

        let username = self
            .username
            .ok_or_else(|| missing(ENV_USERNAME, "API user name is required"))?;

        let password = self
            .password
            .ok_or_else(|| missing(ENV_PASSWORD, "API password is required"))?;

        let config = SyncConfig {
            repository_url,
            clone_path: self
                .clone_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CLONE_PATH)),
            site_url,
            username,
            password,
            marker: self.marker.unwrap_or_else(|| DEFAULT_MARKER.to_string()),
            max_concurrent_uploads: self.max_concurrent_uploads,
            lenient_listing: self.lenient_listing,
            http_timeout: self.http_timeout,
        };

        config.validate()?;

        Ok(config)
    }
}
