//! Users service configuration

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::password::PasswordStorage;

/// Where users are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub password_storage: PasswordStorage,
}

impl ServerConfig {
    /// Load the configuration from environment variables
    ///
    /// # Environment Variables
    /// - `USERS_HOST`: Bind address (default: "0.0.0.0")
    /// - `USERS_PORT`: Bind port (default: 8080)
    /// - `USERS_STORAGE`: `postgres` or `memory` (default: `postgres`)
    /// - `USERS_PASSWORD_STORAGE`: `plain` or `argon2` (default: `plain`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("storage", "postgres")?
            .set_default("password_storage", "plain")?
            .add_source(Environment::with_prefix("USERS").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Bind the listening socket, resolving `host` if it is a name
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port)).await
    }
}
