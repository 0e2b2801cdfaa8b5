//! Card queries

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use flamingo_common::db::Card;
use flamingo_common::{time, SortOrder};
use sqlx::SqliteExecutor;
use uuid::Uuid;

const CARD_COLUMNS: &str =
    "guid, front, back, review_date, interval_days, card_group_guid, created, updated";

/// Insert a new card
pub async fn add_card<'e, E: SqliteExecutor<'e>>(db: E, card: &Card) -> Result<()> {
    if card.interval_days < 1 {
        return Err(Error::InvalidInput(format!(
            "interval_days must be >= 1, got {}",
            card.interval_days
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO cards (guid, front, back, review_date, interval_days, card_group_guid, created, updated)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(card.id.to_string())
    .bind(&card.front)
    .bind(&card.back)
    .bind(time::to_millis(card.review_date))
    .bind(card.interval_days)
    .bind(card.card_group_id.to_string())
    .bind(time::to_millis(card.created))
    .bind(time::to_millis(card.updated))
    .execute(db)
    .await?;

    Ok(())
}

/// Get card by ID
pub async fn get_card<'e, E: SqliteExecutor<'e>>(db: E, card_id: Uuid) -> Result<Card> {
    let row = sqlx::query(&format!("SELECT {} FROM cards WHERE guid = ?", CARD_COLUMNS))
        .bind(card_id.to_string())
        .fetch_optional(db)
        .await?
        .ok_or(Error::CardNotFound(card_id))?;

    Ok(Card::from_row(&row)?)
}

/// Persist a card's interval, review date and `updated`
pub async fn save_card<'e, E: SqliteExecutor<'e>>(db: E, card: &Card) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE cards
        SET front = ?, back = ?, review_date = ?, interval_days = ?, updated = ?
        WHERE guid = ?
        "#,
    )
    .bind(&card.front)
    .bind(&card.back)
    .bind(time::to_millis(card.review_date))
    .bind(card.interval_days)
    .bind(time::to_millis(card.updated))
    .bind(card.id.to_string())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::CardNotFound(card.id));
    }
    Ok(())
}

/// All cards of a group in creation order
pub async fn list_cards_by_group<'e, E: SqliteExecutor<'e>>(
    db: E,
    card_group_id: Uuid,
) -> Result<Vec<Card>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM cards WHERE card_group_guid = ? ORDER BY created ASC, rowid ASC",
        CARD_COLUMNS
    ))
    .bind(card_group_id.to_string())
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(Card::from_row).collect::<flamingo_common::Result<Vec<_>>>()?)
}

/// Up to `limit` cards of a group updated at or after `from_date`
pub async fn list_cards_by_group_since<'e, E: SqliteExecutor<'e>>(
    db: E,
    card_group_id: Uuid,
    from_date: DateTime<Utc>,
    order: SortOrder,
    limit: usize,
) -> Result<Vec<Card>> {
    let sql = format!(
        "SELECT {cols} FROM cards WHERE card_group_guid = ? AND updated >= ? \
         ORDER BY updated {dir}, rowid {dir} LIMIT ?",
        cols = CARD_COLUMNS,
        dir = order.as_sql()
    );

    let rows = sqlx::query(&sql)
        .bind(card_group_id.to_string())
        .bind(time::to_millis(from_date))
        .bind(limit as i64)
        .fetch_all(db)
        .await?;

    Ok(rows.iter().map(Card::from_row).collect::<flamingo_common::Result<Vec<_>>>()?)
}

/// Cards of a group whose review date has passed, earliest first
pub async fn due_cards<'e, E: SqliteExecutor<'e>>(
    db: E,
    card_group_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<Card>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM cards WHERE card_group_guid = ? AND review_date <= ? \
         ORDER BY review_date ASC, rowid ASC",
        CARD_COLUMNS
    ))
    .bind(card_group_id.to_string())
    .bind(time::to_millis(now))
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(Card::from_row).collect::<flamingo_common::Result<Vec<_>>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::setup;
    use chrono::Duration;

    fn card_at(
        group: Uuid,
        front: &str,
        updated: DateTime<Utc>,
        review_date: DateTime<Utc>,
    ) -> Card {
        let mut card = Card::new(group, front, "back");
        card.updated = updated;
        card.review_date = review_date;
        card
    }

    #[tokio::test]
    async fn test_add_and_get_card() {
        let (pool, _user, group) = setup().await;
        let card = Card::new(group.id, "el gato", "the cat");
        add_card(&pool, &card).await.unwrap();

        let loaded = get_card(&pool, card.id).await.unwrap();
        assert_eq!(loaded.front, "el gato");
        assert_eq!(loaded.interval_days, 1);
        assert_eq!(time::to_millis(loaded.review_date), time::to_millis(card.review_date));
    }

    #[tokio::test]
    async fn test_get_missing_card_is_not_found() {
        let (pool, _user, _group) = setup().await;
        let id = Uuid::new_v4();
        let result = get_card(&pool, id).await;
        assert!(matches!(result, Err(Error::CardNotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_save_missing_card_is_not_found() {
        let (pool, _user, group) = setup().await;
        let card = Card::new(group.id, "fantasma", "ghost");
        assert!(matches!(save_card(&pool, &card).await, Err(Error::CardNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_card_rejects_zero_interval() {
        let (pool, _user, group) = setup().await;
        let mut card = Card::new(group.id, "f", "b");
        card.interval_days = 0;
        assert!(matches!(add_card(&pool, &card).await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_save_card_updates_interval() {
        let (pool, _user, group) = setup().await;
        let mut card = Card::new(group.id, "f", "b");
        add_card(&pool, &card).await.unwrap();

        card.interval_days = 7;
        card.review_date = card.review_date + Duration::days(7);
        save_card(&pool, &card).await.unwrap();

        assert_eq!(get_card(&pool, card.id).await.unwrap().interval_days, 7);
    }

    #[tokio::test]
    async fn test_list_since_filters_orders_and_limits() {
        let (pool, _user, group) = setup().await;
        let now = time::now();
        for days_ago in [1, 3, 5, 20] {
            let t = now - Duration::days(days_ago);
            add_card(&pool, &card_at(group.id, &format!("d{}", days_ago), t, t)).await.unwrap();
        }
        let cutoff = now - Duration::days(14);

        let desc = list_cards_by_group_since(&pool, group.id, cutoff, SortOrder::Desc, 10)
            .await
            .unwrap();
        let fronts: Vec<&str> = desc.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, vec!["d1", "d3", "d5"]);

        let asc = list_cards_by_group_since(&pool, group.id, cutoff, SortOrder::Asc, 2)
            .await
            .unwrap();
        let fronts: Vec<&str> = asc.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, vec!["d5", "d3"]);
    }

    #[tokio::test]
    async fn test_due_cards_only_past_review_date() {
        let (pool, _user, group) = setup().await;
        let now = time::now();
        add_card(&pool, &card_at(group.id, "due", now, now - Duration::hours(1))).await.unwrap();
        add_card(&pool, &card_at(group.id, "later", now, now + Duration::days(3))).await.unwrap();

        let due = due_cards(&pool, group.id, now).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].front, "due");
    }

    #[tokio::test]
    async fn test_list_cards_is_scoped_to_group() {
        let (pool, _user, group) = setup().await;
        let other = crate::db::create_card_group(&pool, "other").await.unwrap();
        add_card(&pool, &Card::new(group.id, "mine", "")).await.unwrap();
        add_card(&pool, &Card::new(other.id, "theirs", "")).await.unwrap();

        let cards = list_cards_by_group(&pool, group.id).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "mine");
    }
}
