//! services/api/src/config.rs
//!
//! Runtime configuration, read once from the environment at startup.
//! A `.env` file is honored during local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A failure while reading or parsing the environment.
///
/// Every variable has a default, so the only way to fail is to set one to
/// something unparseable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Everything the server needs to know before it starts listening.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub static_dir: PathBuf,
}

impl Config {
    /// Reads the configuration from environment variables.
    ///
    /// The `.env` lookup is skipped under `cfg!(test)` so the test suite
    /// stays hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address = env_or("BIND_ADDRESS", "0.0.0.0:3000")
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        // The URL scheme selects the storage backend: a `postgres://` URL
        // runs the client-server engine, a `sqlite://` URL the embedded one.
        // The default needs no external setup at all.
        let database_url = env_or("DATABASE_URL", "sqlite://medilog.db?mode=rwc");

        let log_level_str = env_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // Where the browser client's files live.
        let static_dir = PathBuf::from(env_or("STATIC_DIR", "./static"));

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            static_dir,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
