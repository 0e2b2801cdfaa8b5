//! Interval ladder
//!
//! Maps the current review interval and an outcome to the next interval.
//! Pure and deterministic; callers persist the result.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use flamingo_common::db::Card;
use flamingo_common::{time, Outcome};

/// Rungs used when no ladder is configured
pub const DEFAULT_RUNGS: [i64; 5] = [1, 3, 7, 14, 30];

/// Fixed ascending sequence of review intervals in days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalLadder {
    rungs: Vec<i64>,
}

impl IntervalLadder {
    /// Build a ladder, rejecting empty, unordered or non-positive rungs
    pub fn new(rungs: Vec<i64>) -> Result<Self> {
        if rungs.is_empty() {
            return Err(Error::Config("Interval ladder must have at least one rung".to_string()));
        }
        if rungs[0] < 1 {
            return Err(Error::Config(format!(
                "Interval ladder rungs must be >= 1 day, got {}",
                rungs[0]
            )));
        }
        if rungs.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::Config(format!(
                "Interval ladder must be strictly ascending: {:?}",
                rungs
            )));
        }
        Ok(Self { rungs })
    }

    /// Parse a comma-separated list such as `1,3,7,14,30`
    pub fn parse(s: &str) -> Result<Self> {
        let rungs = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>().map_err(|_| {
                    Error::Config(format!("Invalid ladder rung '{}' in '{}'", part, s))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rungs)
    }

    pub fn rungs(&self) -> &[i64] {
        &self.rungs
    }

    pub fn first(&self) -> i64 {
        self.rungs[0]
    }

    pub fn top(&self) -> i64 {
        self.rungs[self.rungs.len() - 1]
    }

    /// Exact-match position of `days`; off-ladder values count as position 0
    fn position(&self, days: i64) -> Option<usize> {
        self.rungs.iter().position(|&rung| rung == days)
    }

    /// Next interval for `current_days` after `outcome`
    ///
    /// Known climbs one rung and saturates at the top. DontKnow drops one
    /// rung and floors at the first. Maybe keeps the interval. Unspecified
    /// starts over on the first rung. Known from an off-ladder value snaps
    /// to the first rung.
    pub fn advance(&self, current_days: i64, outcome: Outcome) -> i64 {
        match outcome {
            Outcome::Known => match self.position(current_days) {
                Some(idx) => self.rungs[(idx + 1).min(self.rungs.len() - 1)],
                None => self.first(),
            },
            Outcome::Maybe => current_days,
            Outcome::DontKnow => {
                let idx = self.position(current_days).unwrap_or(0);
                self.rungs[idx.saturating_sub(1)]
            }
            Outcome::Unspecified => self.first(),
        }
    }

    /// `now + days` whole days
    pub fn next_due_date(&self, now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        time::add_days(now, days)
    }

    /// Card with interval, review date and `updated` moved for `outcome`
    pub fn apply(&self, card: &Card, outcome: Outcome, now: DateTime<Utc>) -> Card {
        let interval_days = self.advance(card.interval_days, outcome);
        Card {
            interval_days,
            review_date: self.next_due_date(now, interval_days),
            updated: now,
            ..card.clone()
        }
    }
}

impl Default for IntervalLadder {
    fn default() -> Self {
        Self {
            rungs: DEFAULT_RUNGS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_known_saturates_at_top_rung() {
        let ladder = IntervalLadder::default();
        let mut days = 1;
        for _ in 0..20 {
            days = ladder.advance(days, Outcome::Known);
            assert!(days <= ladder.top());
        }
        assert_eq!(days, 30);
    }

    #[test]
    fn test_dont_know_floors_at_first_rung() {
        let ladder = IntervalLadder::default();
        let mut days = 30;
        for _ in 0..20 {
            days = ladder.advance(days, Outcome::DontKnow);
            assert!(days >= ladder.first());
        }
        assert_eq!(days, 1);
    }

    #[test]
    fn test_off_ladder_value_snaps_to_first_rung() {
        let ladder = IntervalLadder::default();
        assert_eq!(ladder.advance(100, Outcome::Known), 1);
        assert_eq!(ladder.advance(5, Outcome::DontKnow), 1);
        assert_eq!(ladder.advance(5, Outcome::Maybe), 5);
    }

    #[test]
    fn test_unspecified_resets() {
        let ladder = IntervalLadder::default();
        for days in [1, 3, 14, 30, 100] {
            assert_eq!(ladder.advance(days, Outcome::Unspecified), 1);
        }
    }

    #[test]
    fn test_next_due_date_is_exact() {
        let ladder = IntervalLadder::default();
        let now = fixed_now();
        for days in 1..=60 {
            assert_eq!(ladder.next_due_date(now, days) - now, Duration::days(days));
        }
    }

    #[test]
    fn test_known_known_dont_know_maybe_sequence() {
        let ladder = IntervalLadder::default();
        let now = fixed_now();
        let card = Card::new(Uuid::new_v4(), "la mer", "the sea");

        let card = ladder.apply(&card, Outcome::Known, now);
        assert_eq!(card.interval_days, 3);
        assert_eq!(card.review_date, now + Duration::days(3));
        assert_eq!(card.updated, now);

        let card = ladder.apply(&card, Outcome::Known, now);
        assert_eq!(card.interval_days, 7);

        let card = ladder.apply(&card, Outcome::DontKnow, now);
        assert_eq!(card.interval_days, 3);

        let card = ladder.apply(&card, Outcome::Maybe, now);
        assert_eq!(card.interval_days, 3);
    }

    #[test]
    fn test_huge_off_ladder_interval_does_not_overflow() {
        let ladder = IntervalLadder::default();
        let now = fixed_now();
        let mut card = Card::new(Uuid::new_v4(), "f", "b");
        card.interval_days = 1_000_000_000_000;

        let kept = ladder.apply(&card, Outcome::Maybe, now);
        assert_eq!(kept.interval_days, 1_000_000_000_000);
        assert_eq!(kept.review_date, DateTime::<Utc>::MAX_UTC);

        let snapped = ladder.apply(&card, Outcome::Known, now);
        assert_eq!(snapped.interval_days, 1);
        assert_eq!(snapped.review_date, now + Duration::days(1));
    }

    #[test]
    fn test_invalid_ladders_rejected() {
        assert!(IntervalLadder::new(vec![]).is_err());
        assert!(IntervalLadder::new(vec![0, 3]).is_err());
        assert!(IntervalLadder::new(vec![1, 3, 3]).is_err());
        assert!(IntervalLadder::new(vec![7, 3]).is_err());
        assert!(IntervalLadder::parse("1, x, 7").is_err());
    }

    #[test]
    fn test_parse_default_ladder() {
        let ladder = IntervalLadder::parse(" 1, 3,7 ,14,30 ").unwrap();
        assert_eq!(ladder, IntervalLadder::default());
    }

    #[test]
    fn test_single_rung_ladder() {
        let ladder = IntervalLadder::new(vec![2]).unwrap();
        assert_eq!(ladder.advance(2, Outcome::Known), 2);
        assert_eq!(ladder.advance(2, Outcome::DontKnow), 2);
    }
}
