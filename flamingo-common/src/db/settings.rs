//! Settings database access
//!
//! Key-value store backing the database-first configuration. Values are
//! stored as text and parsed on read.

use crate::{Error, Result};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{info, warn};

/// Setting keys read by the scheduler
pub mod keys {
    pub const BATCH_DEFAULT_AMOUNT: &str = "batch_default_amount";
    pub const CARD_QUERY_LIMIT: &str = "card_query_limit";
    pub const HISTORY_WINDOW: &str = "history_window";
    pub const RECENT_WINDOW_DAYS: &str = "recent_window_days";
    pub const INTERVAL_LADDER: &str = "interval_ladder";
    pub const DIFFICULT_MIN_DONT_KNOW: &str = "difficult_min_dont_know";
    pub const GOOD_MIN_KNOWN: &str = "good_min_known";
    pub const EASY_STREAK: &str = "easy_streak";
    pub const IN_WHILE_GAP_HOURS: &str = "in_while_gap_hours";
}

/// Defaults written on first startup
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    (keys::BATCH_DEFAULT_AMOUNT, "10"),
    (keys::CARD_QUERY_LIMIT, "100"),
    (keys::HISTORY_WINDOW, "10"),
    (keys::RECENT_WINDOW_DAYS, "14"),
    (keys::INTERVAL_LADDER, "1,3,7,14,30"),
    (keys::DIFFICULT_MIN_DONT_KNOW, "5"),
    (keys::GOOD_MIN_KNOWN, "5"),
    (keys::EASY_STREAK, "5"),
    (keys::IN_WHILE_GAP_HOURS, "168"), // one week
];

/// Generic setting getter
///
/// Returns `None` when the key is absent or its value is NULL.
pub async fn get_setting<T: FromStr>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    match value.flatten() {
        Some(s) => match s.trim().parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(Error::Config(format!(
                "Failed to parse setting '{}' value: {}",
                key, s
            ))),
        },
        None => Ok(None),
    }
}

/// Generic setting setter
///
/// Inserts or updates setting in database.
pub async fn set_setting<T: ToString>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()> {
    let value_str = value.to_string();

    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value_str)
    .execute(db)
    .await?;

    Ok(())
}

/// Ensure a setting exists, writing the default when missing or NULL
///
/// Existing non-NULL values are left alone.
pub async fn ensure_setting(db: &Pool<Sqlite>, key: &str, default_value: &str) -> Result<()> {
    let current: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    match current {
        None => {
            // INSERT OR IGNORE tolerates concurrent initialization
            sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(default_value)
                .execute(db)
                .await?;
            info!("Initialized setting '{}' with default value: {}", key, default_value);
        }
        Some(None) => {
            warn!("Setting '{}' was NULL, resetting to default: {}", key, default_value);
            set_setting(db, key, default_value).await?;
        }
        Some(Some(_)) => {}
    }

    Ok(())
}
