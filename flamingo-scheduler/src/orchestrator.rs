//! Swipe orchestrator
//!
//! Handles one interaction per call: load recent history, resolve the
//! tier, apply the transition (tier upsert, card interval update, swipe
//! insert) in a single transaction, then build the next card batch.

use crate::batch;
use crate::config::SchedulerConfig;
use crate::db;
use crate::error::{Error, Result};
use crate::ladder::IntervalLadder;
use crate::strategy::{select_strategy, History};
use chrono::{DateTime, Utc};
use flamingo_common::db::{Card, SwipeRecord};
use flamingo_common::{time, Outcome, SortOrder, Tier};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A newly recorded interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionInput {
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub card_group_id: Uuid,
    pub outcome: Outcome,
}

/// Everything written by one interaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub card_group_id: Uuid,
    pub outcome: Outcome,
    /// Tier stored on the membership and stamped on the swipe record
    pub tier: Tier,
    pub at: DateTime<Utc>,
}

impl Transition {
    pub fn new(input: &InteractionInput, tier: Tier, at: DateTime<Utc>) -> Self {
        Self {
            user_id: input.user_id,
            card_id: input.card_id,
            card_group_id: input.card_group_id,
            outcome: input.outcome,
            tier,
            at,
        }
    }
}

/// Apply a transition inside an open transaction
///
/// Writes the membership tier, moves the card along the ladder and appends
/// the swipe record. The caller commits; on error the transaction must be
/// dropped or rolled back so none of the writes become visible.
pub async fn apply_transition(
    tx: &mut Transaction<'_, Sqlite>,
    ladder: &IntervalLadder,
    transition: &Transition,
) -> Result<Card> {
    db::upsert_membership_tier(
        &mut **tx,
        transition.user_id,
        transition.card_group_id,
        transition.tier,
        transition.at,
    )
    .await?;

    let card = db::get_card(&mut **tx, transition.card_id).await?;
    if card.card_group_id != transition.card_group_id {
        return Err(Error::InvalidInput(format!(
            "Card {} belongs to card group {}, not {}",
            card.id, card.card_group_id, transition.card_group_id
        )));
    }

    let updated = ladder.apply(&card, transition.outcome, transition.at);
    db::save_card(&mut **tx, &updated).await?;

    let record = SwipeRecord::new(
        transition.user_id,
        transition.card_id,
        transition.card_group_id,
        transition.outcome,
        Some(transition.tier),
        transition.at,
    );
    db::insert_interaction(&mut **tx, &record).await?;

    debug!(
        card_id = %card.id,
        from_days = card.interval_days,
        to_days = updated.interval_days,
        "Interval updated"
    );
    Ok(updated)
}

/// Entry point for interaction handling
#[derive(Clone)]
pub struct SwipeOrchestrator {
    db: SqlitePool,
    config: SchedulerConfig,
}

impl SwipeOrchestrator {
    pub fn new(db: SqlitePool, config: SchedulerConfig) -> Self {
        Self { db, config }
    }

    /// Build with parameters read from the settings table
    pub async fn from_settings(db: SqlitePool) -> Result<Self> {
        let config = SchedulerConfig::load(&db).await?;
        Ok(Self::new(db, config))
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Record an interaction and return the next cards to present
    ///
    /// `limit` is the history window; 0 uses the configured window. With no
    /// prior history the current tier is kept (Default for a new pair) and
    /// the group's initial due-ordered batch is returned.
    pub async fn handle_interaction(
        &self,
        input: &InteractionInput,
        order: SortOrder,
        limit: usize,
    ) -> Result<Vec<Card>> {
        let limit = if limit == 0 { self.config.history_window } else { limit };

        // Reject before any write
        let card = db::get_card(&self.db, input.card_id).await?;
        if card.card_group_id != input.card_group_id {
            return Err(Error::InvalidInput(format!(
                "Card {} does not belong to card group {}",
                input.card_id, input.card_group_id
            )));
        }

        let records = db::find_recent_interactions(
            &self.db,
            input.user_id,
            input.card_group_id,
            limit,
            order,
        )
        .await?;
        // Tier selection always reads newest first; `order` only affects loading
        let history = History::from_loaded(records, order);
        let now = time::now();

        if history.is_empty() {
            let tier = db::get_membership(&self.db, input.user_id, input.card_group_id)
                .await?
                .map(|m| m.tier)
                .unwrap_or_default();
            info!(
                user_id = %input.user_id,
                card_group_id = %input.card_group_id,
                %tier,
                "First session for card group"
            );

            self.commit_transition(&Transition::new(input, tier, now)).await?;
            return self.initial_batch(input.card_group_id).await;
        }

        let strategy = select_strategy(&history, now, &self.config.thresholds);
        let tier = strategy.describe();
        debug!(
            records = history.len(),
            known = history.known_count(),
            dont_know = history.dont_know_count(),
            leading_known = history.leading_known_streak(),
            ?strategy,
            "Tier strategy selected"
        );

        self.commit_transition(&Transition::new(input, tier, now)).await?;
        self.next_batch(input.card_group_id, tier, now).await
    }

    /// Due-ordered opening batch for a card group
    pub async fn initial_batch(&self, card_group_id: Uuid) -> Result<Vec<Card>> {
        let cards = db::list_cards_by_group(&self.db, card_group_id).await?;
        let amount = batch::determine_card_amount(&cards, self.config.batch_default_amount)?;
        Ok(batch::due_ordering(cards, amount))
    }

    /// Batch for a card group at the given tier
    pub async fn next_batch(
        &self,
        card_group_id: Uuid,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> Result<Vec<Card>> {
        let cards = db::list_cards_by_group(&self.db, card_group_id).await?;
        let amount = batch::determine_card_amount(&cards, self.config.batch_default_amount)?;
        let query_limit = self.config.card_query_limit;

        let selected = match tier {
            Tier::Difficult | Tier::Good => batch::due_ordering(cards, amount),
            Tier::InWhile => batch::shuffle(batch::due_ordering(cards, query_limit), amount),
            Tier::Easy | Tier::Default => {
                let from_date = now
                    .checked_sub_signed(self.config.recent_window)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                let sample =
                    batch::recent_random_sample(&cards, from_date, query_limit, SortOrder::Desc);
                if sample.is_empty() {
                    debug!(%card_group_id, "No recently touched cards, using due ordering");
                    batch::due_ordering(cards, amount)
                } else {
                    batch::shuffle(sample, amount)
                }
            }
        };

        debug!(%card_group_id, %tier, served = selected.len(), "Batch built");
        Ok(selected)
    }

    async fn commit_transition(&self, transition: &Transition) -> Result<Card> {
        let mut tx = self.db.begin().await?;

        match apply_transition(&mut tx, &self.config.ladder, transition).await {
            Ok(card) => {
                tx.commit().await?;
                info!(
                    user_id = %transition.user_id,
                    card_id = %transition.card_id,
                    outcome = %transition.outcome,
                    tier = %transition.tier,
                    interval_days = card.interval_days,
                    "Transition committed"
                );
                Ok(card)
            }
            Err(e) => {
                warn!(
                    user_id = %transition.user_id,
                    card_id = %transition.card_id,
                    "Transition rolled back: {}",
                    e
                );
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
