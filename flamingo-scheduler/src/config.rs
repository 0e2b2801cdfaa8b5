//! Scheduler configuration
//!
//! Parameters live in the settings table (seeded with defaults at database
//! initialization) and are read once when the orchestrator is built.

use crate::error::{Error, Result};
use crate::ladder::IntervalLadder;
use crate::strategy::TierThresholds;
use chrono::Duration;
use flamingo_common::db::settings::{get_setting, keys};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;

/// Tunable scheduler parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Cards served per batch (upper bound)
    pub batch_default_amount: usize,
    /// Candidate cards considered before shuffling
    pub card_query_limit: usize,
    /// History records used for tier selection
    pub history_window: usize,
    /// How far back the recency sample reaches
    pub recent_window: Duration,
    pub ladder: IntervalLadder,
    pub thresholds: TierThresholds,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_default_amount: 10,
            card_query_limit: 100,
            history_window: 10,
            recent_window: Duration::days(14),
            ladder: IntervalLadder::default(),
            thresholds: TierThresholds::default(),
        }
    }
}

impl SchedulerConfig {
    /// Read parameters from the settings table
    ///
    /// Missing keys take the compiled default; unparseable values are an
    /// error.
    pub async fn load(db: &SqlitePool) -> Result<Self> {
        let defaults = Self::default();

        let ladder = match get_setting::<String>(db, keys::INTERVAL_LADDER).await? {
            Some(s) => IntervalLadder::parse(&s)?,
            None => defaults.ladder,
        };

        let in_while_gap_hours = setting_or(
            db,
            keys::IN_WHILE_GAP_HOURS,
            defaults.thresholds.in_while_gap.num_hours(),
        )
        .await?;
        let recent_window_days =
            setting_or(db, keys::RECENT_WINDOW_DAYS, defaults.recent_window.num_days()).await?;

        let config = Self {
            batch_default_amount: setting_or(
                db,
                keys::BATCH_DEFAULT_AMOUNT,
                defaults.batch_default_amount,
            )
            .await?,
            card_query_limit: setting_or(db, keys::CARD_QUERY_LIMIT, defaults.card_query_limit)
                .await?,
            history_window: setting_or(db, keys::HISTORY_WINDOW, defaults.history_window).await?,
            recent_window: Duration::try_days(recent_window_days).ok_or_else(|| {
                Error::Config(format!("recent_window_days out of range: {}", recent_window_days))
            })?,
            ladder,
            thresholds: TierThresholds {
                difficult_min_dont_know: setting_or(
                    db,
                    keys::DIFFICULT_MIN_DONT_KNOW,
                    defaults.thresholds.difficult_min_dont_know,
                )
                .await?,
                good_min_known: setting_or(
                    db,
                    keys::GOOD_MIN_KNOWN,
                    defaults.thresholds.good_min_known,
                )
                .await?,
                easy_streak: setting_or(db, keys::EASY_STREAK, defaults.thresholds.easy_streak)
                    .await?,
                in_while_gap: Duration::try_hours(in_while_gap_hours).ok_or_else(|| {
                    Error::Config(format!(
                        "in_while_gap_hours out of range: {}",
                        in_while_gap_hours
                    ))
                })?,
            },
        };

        config.validate()?;
        debug!(?config, "Scheduler configuration loaded");
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.batch_default_amount == 0 {
            return Err(Error::Config("batch_default_amount must be at least 1".to_string()));
        }
        if self.card_query_limit <= self.batch_default_amount {
            return Err(Error::Config(format!(
                "card_query_limit ({}) must be greater than batch_default_amount ({})",
                self.card_query_limit, self.batch_default_amount
            )));
        }
        if self.history_window == 0 {
            return Err(Error::Config("history_window must be at least 1".to_string()));
        }
        if self.recent_window <= Duration::zero() {
            return Err(Error::Config("recent_window_days must be positive".to_string()));
        }
        if self.thresholds.in_while_gap <= Duration::zero() {
            return Err(Error::Config("in_while_gap_hours must be positive".to_string()));
        }
        if self.thresholds.easy_streak == 0 {
            return Err(Error::Config("easy_streak must be at least 1".to_string()));
        }
        Ok(())
    }
}

async fn setting_or<T: FromStr>(db: &SqlitePool, key: &str, default: T) -> Result<T> {
    Ok(get_setting::<T>(db, key).await?.unwrap_or(default))
}
