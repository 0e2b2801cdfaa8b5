//! Review enumerations
//!
//! Closed sets of values persisted by the scheduler. Each type has a
//! canonical lowercase database string; anything else read back from
//! storage is rejected rather than coerced.

use serde::{Deserialize, Serialize};

/// The user's immediate response to a single card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Swiped as known
    Known,

    /// Swiped as not known
    DontKnow,

    /// Unsure; leaves the card's interval untouched
    Maybe,

    /// No usable signal; the card starts over at the first rung
    Unspecified,
}

impl Outcome {
    /// Parse from database or request string
    ///
    /// Accepts the canonical names plus the aliases the swipe gestures
    /// used historically (`unknown`, `dont-know`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "known" => Some(Outcome::Known),
            "dont_know" | "dont-know" | "unknown" => Some(Outcome::DontKnow),
            "maybe" => Some(Outcome::Maybe),
            "unspecified" => Some(Outcome::Unspecified),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Outcome::Known => "known",
            Outcome::DontKnow => "dont_know",
            Outcome::Maybe => "maybe",
            Outcome::Unspecified => "unspecified",
        }
    }

    /// Get all outcome variants
    pub fn all_variants() -> &'static [Outcome] {
        &[
            Outcome::Known,
            Outcome::DontKnow,
            Outcome::Maybe,
            Outcome::Unspecified,
        ]
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Engagement classification of a user within a card group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Default,
    Difficult,
    Good,
    Easy,
    InWhile,
}

impl Tier {
    /// Parse from database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(Tier::Default),
            "difficult" => Some(Tier::Difficult),
            "good" => Some(Tier::Good),
            "easy" => Some(Tier::Easy),
            "in_while" | "inwhile" => Some(Tier::InWhile),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Tier::Default => "default",
            Tier::Difficult => "difficult",
            Tier::Good => "good",
            Tier::Easy => "easy",
            Tier::InWhile => "in_while",
        }
    }

    /// Get all tier variants
    pub fn all_variants() -> &'static [Tier] {
        &[
            Tier::Default,
            Tier::Difficult,
            Tier::Good,
            Tier::Easy,
            Tier::InWhile,
        ]
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Ordering direction for timestamp-ordered queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse an order value coming from a caller
    ///
    /// Unrecognized values fall back to descending.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => SortOrder::Asc,
            "desc" | "descending" => SortOrder::Desc,
            other => {
                tracing::debug!(value = other, "Unrecognized sort order, using descending");
                SortOrder::Desc
            }
        }
    }

    /// SQL keyword for ORDER BY clauses
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl From<&str> for SortOrder {
    fn from(s: &str) -> Self {
        SortOrder::parse_lossy(s)
    }
}
