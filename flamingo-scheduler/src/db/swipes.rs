//! Swipe record queries
//!
//! Records are append-only; history is read back ordered by `updated`.

use crate::error::Result;
use flamingo_common::db::SwipeRecord;
use flamingo_common::{time, SortOrder};
use sqlx::SqliteExecutor;
use uuid::Uuid;

/// Up to `limit` most recent records for (user, card group)
///
/// The newest `limit` records are always the ones selected; `order` only
/// decides the direction they are returned in.
pub async fn find_recent_interactions<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: Uuid,
    card_group_id: Uuid,
    limit: usize,
    order: SortOrder,
) -> Result<Vec<SwipeRecord>> {
    let sql = format!(
        r#"
        SELECT * FROM (
            SELECT rowid AS seq, guid, user_guid, card_guid, card_group_guid,
                   outcome, tier, created, updated
            FROM swipe_records
            WHERE user_guid = ? AND card_group_guid = ?
            ORDER BY updated DESC, rowid DESC
            LIMIT ?
        )
        ORDER BY updated {dir}, seq {dir}
        "#,
        dir = order.as_sql()
    );

    let rows = sqlx::query(&sql)
        .bind(user_id.to_string())
        .bind(card_group_id.to_string())
        .bind(limit as i64)
        .fetch_all(db)
        .await?;

    Ok(rows
        .iter()
        .map(SwipeRecord::from_row)
        .collect::<flamingo_common::Result<Vec<_>>>()?)
}

pub async fn insert_interaction<'e, E: SqliteExecutor<'e>>(
    db: E,
    record: &SwipeRecord,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO swipe_records
            (guid, user_guid, card_guid, card_group_guid, outcome, tier, created, updated)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.user_id.to_string())
    .bind(record.card_id.to_string())
    .bind(record.card_group_id.to_string())
    .bind(record.outcome.to_db_string())
    .bind(record.tier.map(|t| t.to_db_string()))
    .bind(time::to_millis(record.created))
    .bind(time::to_millis(record.updated))
    .execute(db)
    .await?;

    Ok(())
}

pub async fn count_interactions<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: Uuid,
    card_group_id: Uuid,
) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM swipe_records WHERE user_guid = ? AND card_group_guid = ?",
    )
    .bind(user_id.to_string())
    .bind(card_group_id.to_string())
    .fetch_one(db)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::add_card;
    use crate::db::fixtures::setup;
    use chrono::Duration;
    use flamingo_common::db::Card;
    use flamingo_common::{Outcome, Tier};

    #[tokio::test]
    async fn test_recent_interactions_window_and_order() {
        let (pool, user, group) = setup().await;
        let card = Card::new(group.id, "f", "b");
        add_card(&pool, &card).await.unwrap();

        let base = time::now() - Duration::hours(10);
        let outcomes = [Outcome::Known, Outcome::DontKnow, Outcome::Maybe, Outcome::Known];
        for (i, outcome) in outcomes.iter().enumerate() {
            let at = base + Duration::hours(i as i64);
            let record = SwipeRecord::new(user.id, card.id, group.id, *outcome, None, at);
            insert_interaction(&pool, &record).await.unwrap();
        }

        let desc = find_recent_interactions(&pool, user.id, group.id, 3, SortOrder::Desc)
            .await
            .unwrap();
        let got: Vec<Outcome> = desc.iter().map(|r| r.outcome).collect();
        assert_eq!(got, vec![Outcome::Known, Outcome::Maybe, Outcome::DontKnow]);

        let asc = find_recent_interactions(&pool, user.id, group.id, 3, SortOrder::Asc)
            .await
            .unwrap();
        let got: Vec<Outcome> = asc.iter().map(|r| r.outcome).collect();
        assert_eq!(got, vec![Outcome::DontKnow, Outcome::Maybe, Outcome::Known]);
    }

    #[tokio::test]
    async fn test_insert_keeps_tier_marker() {
        let (pool, user, group) = setup().await;
        let card = Card::new(group.id, "f", "b");
        add_card(&pool, &card).await.unwrap();

        let record = SwipeRecord::new(
            user.id,
            card.id,
            group.id,
            Outcome::Known,
            Some(Tier::Easy),
            time::now(),
        );
        insert_interaction(&pool, &record).await.unwrap();

        let loaded = find_recent_interactions(&pool, user.id, group.id, 10, SortOrder::Desc)
            .await
            .unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].tier, Some(Tier::Easy));
        assert_eq!(loaded[0].id, record.id);
        assert_eq!(count_interactions(&pool, user.id, group.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_outcome_in_storage_is_error() {
        let (pool, user, group) = setup().await;
        let card = Card::new(group.id, "f", "b");
        add_card(&pool, &card).await.unwrap();

        sqlx::query(
            "INSERT INTO swipe_records (guid, user_guid, card_guid, card_group_guid, outcome, created, updated) \
             VALUES (?, ?, ?, ?, 'swiped_up', 0, 0)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user.id.to_string())
        .bind(card.id.to_string())
        .bind(group.id.to_string())
        .execute(&pool)
        .await
        .unwrap();

        let result = find_recent_interactions(&pool, user.id, group.id, 10, SortOrder::Desc).await;
        assert!(result.is_err());
    }
}
