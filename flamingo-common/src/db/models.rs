//! Database models
//!
//! Row types for the scheduler tables. Identities are stored as UUID text
//! and timestamps as unix milliseconds; `from_row` converts both back and
//! rejects enum strings outside the closed sets.

use crate::review::{Outcome, Tier};
use crate::time;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl User {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(row.get("guid"), "users.guid")?,
            name: row.get("name"),
            created: time::from_millis(row.get("created")),
            updated: time::from_millis(row.get("updated")),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardGroup {
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl CardGroup {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(row.get("guid"), "card_groups.guid")?,
            name: row.get("name"),
            created: time::from_millis(row.get("created")),
            updated: time::from_millis(row.get("updated")),
        })
    }
}

/// A flashcard and its position on the interval ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    /// Next due timestamp
    pub review_date: DateTime<Utc>,
    /// Current ladder rung in days (>= 1)
    pub interval_days: i64,
    pub card_group_id: Uuid,
    pub created: DateTime<Utc>,
    /// Last time the interval changed
    pub updated: DateTime<Utc>,
}

impl Card {
    /// New card due immediately on the first rung
    pub fn new(card_group_id: Uuid, front: impl Into<String>, back: impl Into<String>) -> Self {
        let now = time::now();
        Self {
            id: Uuid::new_v4(),
            front: front.into(),
            back: back.into(),
            review_date: now,
            interval_days: 1,
            card_group_id,
            created: now,
            updated: now,
        }
    }

    /// `updated + interval_days`, the instant the card becomes eligible again
    pub fn due_instant(&self) -> DateTime<Utc> {
        time::add_days(self.updated, self.interval_days)
    }

    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(row.get("guid"), "cards.guid")?,
            front: row.get("front"),
            back: row.get("back"),
            review_date: time::from_millis(row.get("review_date")),
            interval_days: row.get("interval_days"),
            card_group_id: parse_uuid(row.get("card_group_guid"), "cards.card_group_guid")?,
            created: time::from_millis(row.get("created")),
            updated: time::from_millis(row.get("updated")),
        })
    }
}

/// One recorded interaction, append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub card_group_id: Uuid,
    pub outcome: Outcome,
    /// Tier resolved for this interaction (audit marker)
    pub tier: Option<Tier>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl SwipeRecord {
    pub fn new(
        user_id: Uuid,
        card_id: Uuid,
        card_group_id: Uuid,
        outcome: Outcome,
        tier: Option<Tier>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            card_id,
            card_group_id,
            outcome,
            tier,
            created: at,
            updated: at,
        }
    }

    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        let outcome_str: String = row.get("outcome");
        let outcome = Outcome::from_str(&outcome_str).ok_or_else(|| {
            Error::Internal(format!("Unknown outcome in swipe_records: {}", outcome_str))
        })?;

        let tier = match row.get::<Option<String>, _>("tier") {
            Some(s) => Some(parse_tier(&s, "swipe_records.tier")?),
            None => None,
        };

        Ok(Self {
            id: parse_uuid(row.get("guid"), "swipe_records.guid")?,
            user_id: parse_uuid(row.get("user_guid"), "swipe_records.user_guid")?,
            card_id: parse_uuid(row.get("card_guid"), "swipe_records.card_guid")?,
            card_group_id: parse_uuid(row.get("card_group_guid"), "swipe_records.card_group_guid")?,
            outcome,
            tier,
            created: time::from_millis(row.get("created")),
            updated: time::from_millis(row.get("updated")),
        })
    }
}

/// Tier of a user within a card group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: Uuid,
    pub card_group_id: Uuid,
    pub tier: Tier,
    pub updated: DateTime<Utc>,
}

impl Membership {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        let tier_str: String = row.get("tier");
        Ok(Self {
            user_id: parse_uuid(row.get("user_guid"), "card_group_users.user_guid")?,
            card_group_id: parse_uuid(
                row.get("card_group_guid"),
                "card_group_users.card_group_guid",
            )?,
            tier: parse_tier(&tier_str, "card_group_users.tier")?,
            updated: time::from_millis(row.get("updated")),
        })
    }
}

fn parse_uuid(value: String, column: &str) -> Result<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|e| Error::Internal(format!("Invalid UUID in {}: {} ({})", column, value, e)))
}

fn parse_tier(value: &str, column: &str) -> Result<Tier> {
    Tier::from_str(value)
        .ok_or_else(|| Error::Internal(format!("Unknown tier in {}: {}", column, value)))
}
