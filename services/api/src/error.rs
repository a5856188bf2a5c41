//! services/api/src/error.rs
//!
//! The top-level error type for the `api` binaries.

use crate::config::ConfigError;
use medilog_core::ports::StoreError;

/// Anything that can abort server startup or shutdown.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The environment could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A failure surfaced through the persistence port.
    #[error("Store Error: {0}")]
    Store(#[from] StoreError),

    /// A failure in the database driver itself (connecting, schema setup).
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// A socket-level failure, e.g. the listen address is already taken.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
