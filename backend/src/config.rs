//! Application configuration read from a JSON file.
//!
//! The file is loaded once at startup and the resulting [`AppConfig`] is
//! handed to the components that need it. Secrets (session key, OAuth client
//! secrets) are wiped from memory when the config is dropped.
//!
//! ```json
//! {
//!   "google_oauth": { "client_id": "...", "client_secret": "..." },
//!   "session_key": "at least 64 characters ...",
//!   "database_url": "storage.db",
//!   "port": 8080
//! }
//! ```

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use url::Url;
use zeroize::{Zeroize, Zeroizing};

use crate::outbound::oauth::OAuthClientCredentials;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "conf.json";
/// Minimum session key length in bytes.
pub const SESSION_KEY_MIN_LEN: usize = 64;

const DEFAULT_DATABASE_URL: &str = "storage.db";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be opened or read.
    #[error("failed to read config at {path}: {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for [`AppConfig`].
    #[error("failed to parse config: {source}")]
    Parse {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The session key is shorter than [`SESSION_KEY_MIN_LEN`].
    #[error("session_key too short: need >= {min_len} bytes, got {length}")]
    SessionKeyTooShort {
        /// Length of the configured key.
        length: usize,
        /// Required minimum.
        min_len: usize,
    },
    /// `public_url` is not an absolute URL.
    #[error("invalid public_url '{value}': {source}")]
    PublicUrl {
        /// The rejected value.
        value: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// `database_url` is blank.
    #[error("database_url must not be empty")]
    EmptyDatabaseUrl,
}

/// OAuth application credentials for one provider.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSecrets {
    client_id: String,
    client_secret: String,
}

impl ProviderSecrets {
    /// Public client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Credentials in the shape the OAuth adapter expects.
    #[must_use]
    pub fn to_credentials(&self) -> OAuthClientCredentials {
        OAuthClientCredentials {
            client_id: self.client_id.clone(),
            client_secret: Zeroizing::new(self.client_secret.clone()),
        }
    }
}

impl Drop for ProviderSecrets {
    fn drop(&mut self) {
        self.client_secret.zeroize();
    }
}

impl std::fmt::Debug for ProviderSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSecrets")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Settings shared by the server and the seed import.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    google_oauth: Option<ProviderSecrets>,
    #[serde(default)]
    facebook_oauth: Option<ProviderSecrets>,
    session_key: String,
    #[serde(default = "default_database_url")]
    database_url: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    public_url: Option<String>,
    #[serde(default)]
    cookie_secure: bool,
    #[serde(default = "default_pool_max_size")]
    pool_max_size: u32,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_owned()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_pool_max_size() -> u32 {
    DEFAULT_POOL_MAX_SIZE
}

impl AppConfig {
    /// Read and validate the JSON file at `path`.
    ///
    /// # Errors
    /// [`ConfigError::Read`] for I/O failures, [`ConfigError::Parse`] for bad
    /// JSON, or any validation error from [`AppConfig::from_json`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path.file_name().ok_or_else(|| {
            read_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "config path must name a file",
            ))
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let raw = Zeroizing::new(dir.read_to_string(Path::new(file_name)).map_err(read_error)?);
        Self::from_json(&raw)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// Fails on malformed JSON, a short session key, a blank database URL or
    /// a relative `public_url`.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let length = self.session_key.len();
        if length < SESSION_KEY_MIN_LEN {
            return Err(ConfigError::SessionKeyTooShort {
                length,
                min_len: SESSION_KEY_MIN_LEN,
            });
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        self.public_url()?;
        Ok(())
    }

    /// Override the listening port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the database location.
    #[must_use]
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    /// Google credentials, when configured.
    #[must_use]
    pub const fn google_oauth(&self) -> Option<&ProviderSecrets> {
        self.google_oauth.as_ref()
    }

    /// Facebook credentials, when configured.
    #[must_use]
    pub const fn facebook_oauth(&self) -> Option<&ProviderSecrets> {
        self.facebook_oauth.as_ref()
    }

    /// Cookie encryption key derived from `session_key`.
    #[must_use]
    pub fn session_key(&self) -> Key {
        Key::derive_from(self.session_key.as_bytes())
    }

    /// SQLite database path.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Listening port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Whether session cookies carry the `Secure` attribute.
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Upper bound on pooled database connections.
    #[must_use]
    pub const fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }

    /// Externally visible base URL, always ending in `/`.
    ///
    /// # Errors
    /// [`ConfigError::PublicUrl`] when the configured value does not parse.
    pub fn public_url(&self) -> Result<Url, ConfigError> {
        let value = self
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}/", self.port));
        let mut url = Url::parse(&value).map_err(|source| ConfigError::PublicUrl {
            value: value.clone(),
            source,
        })?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Callback URL registered with `provider`, e.g. `{public_url}google/callback`.
    ///
    /// # Errors
    /// [`ConfigError::PublicUrl`] when the base URL is invalid.
    pub fn redirect_url(&self, provider: &str) -> Result<Url, ConfigError> {
        let base = self.public_url()?;
        base.join(&format!("{provider}/callback"))
            .map_err(|source| ConfigError::PublicUrl {
                value: base.to_string(),
                source,
            })
    }
}

impl Drop for AppConfig {
    fn drop(&mut self) {
        self.session_key.zeroize();
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("google_oauth", &self.google_oauth)
            .field("facebook_oauth", &self.facebook_oauth)
            .field("database_url", &self.database_url)
            .field("port", &self.port)
            .field("public_url", &self.public_url)
            .field("cookie_secure", &self.cookie_secure)
            .field("pool_max_size", &self.pool_max_size)
            .finish_non_exhaustive()
    }
}
