//! Shared error type for the flamingo crates
//!
//! Storage, settings and row decoding report through this type; the
//! scheduler wraps it in its own error.

use thiserror::Error;

/// Result alias used throughout flamingo-common
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Query, connection or constraint failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the root folder or reading a config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML or a setting value that does not parse
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data no longer decodes (bad UUID, unknown outcome or tier)
    #[error("Corrupt stored value: {0}")]
    Internal(String),
}
