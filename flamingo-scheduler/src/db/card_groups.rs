//! Users, card groups and enrolment

use crate::error::Result;
use flamingo_common::db::{CardGroup, User};
use flamingo_common::{time, Tier};
use sqlx::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

pub async fn create_user<'e, E: SqliteExecutor<'e>>(db: E, name: &str) -> Result<User> {
    let now = time::now();
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created: now,
        updated: now,
    };

    sqlx::query("INSERT INTO users (guid, name, created, updated) VALUES (?, ?, ?, ?)")
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(time::to_millis(user.created))
        .bind(time::to_millis(user.updated))
        .execute(db)
        .await?;

    Ok(user)
}

pub async fn create_card_group<'e, E: SqliteExecutor<'e>>(db: E, name: &str) -> Result<CardGroup> {
    let now = time::now();
    let group = CardGroup {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created: now,
        updated: now,
    };

    sqlx::query("INSERT INTO card_groups (guid, name, created, updated) VALUES (?, ?, ?, ?)")
        .bind(group.id.to_string())
        .bind(&group.name)
        .bind(time::to_millis(group.created))
        .bind(time::to_millis(group.updated))
        .execute(db)
        .await?;

    Ok(group)
}

/// Enrol a user in a card group with the Default tier
///
/// Re-enrolling leaves the existing membership and its tier alone.
pub async fn add_user_to_group<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: Uuid,
    card_group_id: Uuid,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO card_group_users (card_group_guid, user_guid, tier, updated)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(card_group_id.to_string())
    .bind(user_id.to_string())
    .bind(Tier::Default.to_db_string())
    .bind(time::to_millis(time::now()))
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        debug!(%user_id, %card_group_id, "User already enrolled in card group");
    }
    Ok(())
}
