//! Service settings loaded via OrthoConfig.
//!
//! Values come from command-line flags, `USER_REGISTRY_*` environment
//! variables and an optional configuration file, in that order of precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime settings for the user registry server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_REGISTRY")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without one the server keeps users in
    /// memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Skip applying embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

/// Raised when a setting is present but unusable.
#[derive(Debug, thiserror::Error)]
#[error("invalid bind address {value:?}: {source}")]
pub struct InvalidBindAddr {
    value: String,
    #[source]
    source: std::net::AddrParseError,
}

impl AppSettings {
    /// Return the configured listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`InvalidBindAddr`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, InvalidBindAddr> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| InvalidBindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the pool size, falling back to ten connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
