//! Group membership tier queries

use crate::error::Result;
use chrono::{DateTime, Utc};
use flamingo_common::db::Membership;
use flamingo_common::{time, Tier};
use sqlx::SqliteExecutor;
use uuid::Uuid;

/// Set the tier for (user, card group), creating the row if needed
pub async fn upsert_membership_tier<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: Uuid,
    card_group_id: Uuid,
    tier: Tier,
    updated: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO card_group_users (card_group_guid, user_guid, tier, updated)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(card_group_guid, user_guid)
        DO UPDATE SET tier = excluded.tier, updated = excluded.updated
        "#,
    )
    .bind(card_group_id.to_string())
    .bind(user_id.to_string())
    .bind(tier.to_db_string())
    .bind(time::to_millis(updated))
    .execute(db)
    .await?;

    Ok(())
}

pub async fn get_membership<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: Uuid,
    card_group_id: Uuid,
) -> Result<Option<Membership>> {
    let row = sqlx::query(
        r#"
        SELECT card_group_guid, user_guid, tier, updated
        FROM card_group_users
        WHERE user_guid = ? AND card_group_guid = ?
        "#,
    )
    .bind(user_id.to_string())
    .bind(card_group_id.to_string())
    .fetch_optional(db)
    .await?;

    match row {
        Some(row) => Ok(Some(Membership::from_row(&row)?)),
        None => Ok(None),
    }
}
