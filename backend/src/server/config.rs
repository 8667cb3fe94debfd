//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use backend::config::AppConfig;

/// Cookie name carrying the encrypted session.
pub const SESSION_COOKIE_NAME: &str = "sessionid";

/// Listener and session-cookie settings for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Construct a server configuration from explicit values.
    #[must_use]
    pub const fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
        }
    }

    /// Listen on every interface at the configured port with `SameSite=Lax`
    /// cookies.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            config.session_key(),
            config.cookie_secure(),
            SameSite::Lax,
            SocketAddr::from(([0, 0, 0, 0], config.port())),
        )
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
