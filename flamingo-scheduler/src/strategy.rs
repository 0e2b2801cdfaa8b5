//! Tier strategies
//!
//! Five mutually exclusive policies evaluated against an immutable history
//! snapshot. Selection is first-match in [`TierStrategy::PRIORITY`] order;
//! `Default` always applies, so selection always yields exactly one.

use chrono::{DateTime, Duration, Utc};
use flamingo_common::db::SwipeRecord;
use flamingo_common::{Outcome, SortOrder, Tier};

/// Numeric cutoffs for the tier strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierThresholds {
    /// Difficult when at least this many records are DontKnow
    pub difficult_min_dont_know: usize,
    /// Good when at least this many records are Known (below an Easy streak)
    pub good_min_known: usize,
    /// Easy when this many leading records are all Known
    pub easy_streak: usize,
    /// InWhile when the newest record is older than this
    pub in_while_gap: Duration,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            difficult_min_dont_know: 5,
            good_min_known: 5,
            easy_streak: 5,
            in_while_gap: Duration::hours(168),
        }
    }
}

/// Recent swipe records for one (user, card group) pair, newest first
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<SwipeRecord>,
}

impl History {
    /// Snapshot from records in any order
    ///
    /// Records are sorted newest first by `updated`; ties keep their input
    /// order.
    pub fn new(mut records: Vec<SwipeRecord>) -> Self {
        records.sort_by(|a, b| b.updated.cmp(&a.updated));
        Self { records }
    }

    /// Snapshot from records loaded in `order` (ties in insertion order)
    ///
    /// Ascending loads are reversed first, so equal timestamps still end up
    /// newest insertion first.
    pub fn from_loaded(mut records: Vec<SwipeRecord>, order: SortOrder) -> Self {
        if order == SortOrder::Asc {
            records.reverse();
        }
        Self::new(records)
    }

    pub fn records(&self) -> &[SwipeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn known_count(&self) -> usize {
        self.count(Outcome::Known)
    }

    pub fn dont_know_count(&self) -> usize {
        self.count(Outcome::DontKnow)
    }

    /// Number of Known records before the first non-Known one
    pub fn leading_known_streak(&self) -> usize {
        self.records
            .iter()
            .take_while(|r| r.outcome == Outcome::Known)
            .count()
    }

    /// Newest `updated` timestamp regardless of load order
    pub fn most_recent_update(&self) -> Option<DateTime<Utc>> {
        self.records.iter().map(|r| r.updated).max()
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }
}

/// Closed set of tier policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierStrategy {
    Difficult,
    Good,
    Easy,
    InWhile,
    Default,
}

impl TierStrategy {
    /// Evaluation order; the first applicable strategy wins
    pub const PRIORITY: [TierStrategy; 5] = [
        TierStrategy::Difficult,
        TierStrategy::Good,
        TierStrategy::Easy,
        TierStrategy::InWhile,
        TierStrategy::Default,
    ];

    pub fn is_applicable(
        &self,
        history: &History,
        now: DateTime<Utc>,
        thresholds: &TierThresholds,
    ) -> bool {
        match self {
            TierStrategy::Difficult => {
                !history.is_empty()
                    && history.dont_know_count() >= thresholds.difficult_min_dont_know
            }
            TierStrategy::Good => {
                !history.is_empty()
                    && history.known_count() >= thresholds.good_min_known
                    && history.leading_known_streak() < thresholds.easy_streak
            }
            TierStrategy::Easy => {
                !history.is_empty() && history.leading_known_streak() >= thresholds.easy_streak
            }
            TierStrategy::InWhile => match history.most_recent_update() {
                Some(last) => now - last > thresholds.in_while_gap,
                None => false,
            },
            TierStrategy::Default => true,
        }
    }

    /// Tier this strategy moves the membership to
    pub fn describe(&self) -> Tier {
        match self {
            TierStrategy::Difficult => Tier::Difficult,
            TierStrategy::Good => Tier::Good,
            TierStrategy::Easy => Tier::Easy,
            TierStrategy::InWhile => Tier::InWhile,
            TierStrategy::Default => Tier::Default,
        }
    }
}

/// First applicable strategy in priority order
pub fn select_strategy(
    history: &History,
    now: DateTime<Utc>,
    thresholds: &TierThresholds,
) -> TierStrategy {
    TierStrategy::PRIORITY
        .into_iter()
        .find(|strategy| strategy.is_applicable(history, now, thresholds))
        .unwrap_or(TierStrategy::Default)
}
