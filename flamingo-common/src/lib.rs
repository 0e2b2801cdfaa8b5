//! # Flamingo Common Library
//!
//! Shared code for the flamingo flashcard backend including:
//! - Database schema, row models and the settings store
//! - Review enumerations (outcomes, tiers, sort order)
//! - Configuration loading and root folder resolution
//! - Logging initialisation
//! - Timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod review;
pub mod time;

pub use error::{Error, Result};
pub use review::{Outcome, SortOrder, Tier};
