//! Error types for flamingo-scheduler
//!
//! Persistence failures are surfaced unmodified; the engine never retries.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the scheduling engine
#[derive(Error, Debug)]
pub enum Error {
    /// Errors raised by the shared crate (schema, settings, row decoding)
    #[error(transparent)]
    Common(#[from] flamingo_common::Error),

    /// Database connection, query or transaction errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Interval update requested for a card that does not exist
    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    /// Card pool is empty, nothing to schedule
    #[error("No cards to schedule")]
    EmptyCardPool,

    /// Invalid request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scheduler settings failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type using the scheduler Error
pub type Result<T> = std::result::Result<T, Error>;
