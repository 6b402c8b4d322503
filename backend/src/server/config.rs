//! HTTP server configuration loaded from the environment.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::warn;

/// Environment-derived settings for the HTTP server.
pub struct ServerConfig {
    key: Key,
    cookie_secure: bool,
    bind_addr: SocketAddr,
    database_url: String,
}

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `DATABASE_URL` is not set.
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The bind address did not parse.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr {
        /// The offending bind address value.
        value: String,
        /// Details of the parse failure.
        message: String,
    },
    /// The session key file could not be read outside development.
    #[error("failed to read session key at {path}: {message}")]
    SessionKey {
        /// Path to the session key file.
        path: String,
        /// Details of the read failure.
        message: String,
    },
}

impl ServerConfig {
    /// Assemble the configuration from environment variables.
    ///
    /// - `BIND_ADDR` (default `0.0.0.0:8080`)
    /// - `DATABASE_URL` (required)
    /// - `SESSION_KEY_FILE` (default `/var/run/secrets/session_key`); debug
    ///   builds and `SESSION_ALLOW_EPHEMERAL=1` fall back to a generated key
    /// - `SESSION_COOKIE_SECURE` (`0` disables the `Secure` cookie flag)
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
        let bind_addr = bind_raw
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                value: bind_raw,
                message: err.to_string(),
            })?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let key_path = env::var("SESSION_KEY_FILE")
            .unwrap_or_else(|_| "/var/run/secrets/session_key".to_owned());
        let key = match std::fs::read(&key_path) {
            Ok(bytes) => Key::derive_from(&bytes),
            Err(err) => {
                let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %key_path, error = %err, "using temporary session key (dev only)");
                    Key::generate()
                } else {
                    return Err(ConfigError::SessionKey {
                        path: key_path,
                        message: err.to_string(),
                    });
                }
            }
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        Ok(Self {
            key,
            cookie_secure,
            bind_addr,
            database_url,
        })
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// The PostgreSQL connection string.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// The session signing/encryption key.
    #[must_use]
    pub fn session_key(&self) -> Key {
        self.key.clone()
    }

    /// Whether session cookies carry the `Secure` flag.
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}
