//! Database initialization
//!
//! Creates the database file on first run, applies the schema and seeds
//! default settings. Every step is idempotent, so opening an existing
//! database runs the same path.

use crate::db::settings::{ensure_setting, keys, DEFAULT_SETTINGS};
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL allows concurrent readers alongside the single writer; sessions
    // for different (user, group) pairs proceed in parallel.
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// Uses a single connection that never expires, so every query sees the
/// same database for the life of the pool.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_card_groups_table(pool).await?;
    create_cards_table(pool).await?;
    create_card_group_users_table(pool).await?;
    create_swipe_records_table(pool).await?;
    create_settings_table(pool).await?;

    debug!("Schema ready");
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created INTEGER NOT NULL,
            updated INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_card_groups_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS card_groups (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created INTEGER NOT NULL,
            updated INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_cards_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cards (
            guid TEXT PRIMARY KEY,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            review_date INTEGER NOT NULL,
            interval_days INTEGER NOT NULL DEFAULT 1 CHECK (interval_days >= 1),
            card_group_guid TEXT NOT NULL REFERENCES card_groups(guid) ON DELETE CASCADE,
            created INTEGER NOT NULL,
            updated INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_cards_group_updated ON cards(card_group_guid, updated)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_card_group_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS card_group_users (
            card_group_guid TEXT NOT NULL REFERENCES card_groups(guid) ON DELETE CASCADE,
            user_guid TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            tier TEXT NOT NULL DEFAULT 'default',
            updated INTEGER NOT NULL,
            PRIMARY KEY (card_group_guid, user_guid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_swipe_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS swipe_records (
            guid TEXT PRIMARY KEY,
            user_guid TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            card_guid TEXT NOT NULL REFERENCES cards(guid) ON DELETE CASCADE,
            card_group_guid TEXT NOT NULL REFERENCES card_groups(guid) ON DELETE CASCADE,
            outcome TEXT NOT NULL,
            tier TEXT,
            created INTEGER NOT NULL,
            updated INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_swipe_records_pair_updated \
         ON swipe_records(user_guid, card_group_guid, updated)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Ensure every scheduler setting exists with its default value
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    for (key, default_value) in DEFAULT_SETTINGS {
        ensure_setting(pool, key, default_value).await?;
    }

    debug!(
        "Default settings present ({} keys, ladder key '{}')",
        DEFAULT_SETTINGS.len(),
        keys::INTERVAL_LADDER
    );
    Ok(())
}
