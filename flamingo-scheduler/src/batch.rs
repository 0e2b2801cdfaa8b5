//! Batch selection
//!
//! Turns a card group's pool into the next presentation set: how many
//! cards, due-date ordering, recency sampling and shuffling.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use flamingo_common::db::Card;
use flamingo_common::SortOrder;
use rand::seq::SliceRandom;

/// Number of cards to serve: the lesser of `known_threshold` and the pool size
///
/// An empty pool is an error; there is nothing to schedule.
pub fn determine_card_amount(cards: &[Card], known_threshold: usize) -> Result<usize> {
    if cards.is_empty() {
        return Err(Error::EmptyCardPool);
    }
    Ok(known_threshold.min(cards.len()))
}

/// First `limit` cards by ascending due instant (`updated + interval_days`)
///
/// The sort is stable, so ties keep their input order.
pub fn due_ordering(mut cards: Vec<Card>, limit: usize) -> Vec<Card> {
    cards.sort_by_key(Card::due_instant);
    cards.truncate(limit);
    cards
}

/// Up to `limit` cards touched at or after `from_date`, ordered by `updated`
///
/// Returns fewer than `limit` when fewer qualify.
pub fn recent_random_sample(
    cards: &[Card],
    from_date: DateTime<Utc>,
    limit: usize,
    order: SortOrder,
) -> Vec<Card> {
    let mut recent: Vec<Card> = cards
        .iter()
        .filter(|card| card.updated >= from_date)
        .cloned()
        .collect();

    match order {
        SortOrder::Asc => recent.sort_by_key(|card| card.updated),
        SortOrder::Desc => recent.sort_by(|a, b| b.updated.cmp(&a.updated)),
    }
    recent.truncate(limit);
    recent
}

/// Random permutation of `items`, cut to `limit`
///
/// Draws from a fresh thread-local generator on every call.
pub fn shuffle<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.shuffle(&mut rand::thread_rng());
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()
    }

    fn card(front: &str, updated_days_ago: i64, interval_days: i64) -> Card {
        let mut card = Card::new(Uuid::nil(), front, "");
        card.updated = base() - Duration::days(updated_days_ago);
        card.interval_days = interval_days;
        card
    }

    fn fronts(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.front.as_str()).collect()
    }

    #[test]
    fn test_amount_is_lesser_of_threshold_and_pool() {
        let pool = vec![card("a", 0, 1), card("b", 0, 1), card("c", 0, 1)];
        assert_eq!(determine_card_amount(&pool, 10).unwrap(), 3);
        assert_eq!(determine_card_amount(&pool, 2).unwrap(), 2);
    }

    #[test]
    fn test_amount_of_empty_pool_is_error() {
        assert!(matches!(determine_card_amount(&[], 10), Err(Error::EmptyCardPool)));
    }

    #[test]
    fn test_due_ordering_sorts_by_due_instant() {
        // due: a = -10+30 = +20, b = -2+1 = -1, c = -5+7 = +2
        let cards = vec![card("a", 10, 30), card("b", 2, 1), card("c", 5, 7)];
        assert_eq!(fronts(&due_ordering(cards, 10)), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_due_ordering_is_stable_and_limited() {
        let cards = vec![card("x", 3, 3), card("y", 3, 3), card("z", 6, 1)];
        assert_eq!(fronts(&due_ordering(cards, 2)), vec!["z", "x"]);
    }

    #[test]
    fn test_due_ordering_puts_huge_interval_last() {
        let cards = vec![card("parked", 5, 1_000_000_000_000), card("a", 1, 1), card("b", 2, 3)];
        assert_eq!(fronts(&due_ordering(cards, 10)), vec!["a", "b", "parked"]);
    }

    #[test]
    fn test_recent_sample_respects_cutoff_and_limit() {
        let cards: Vec<Card> = (0..20).map(|i| card(&format!("c{}", i), i, 1)).collect();
        let cutoff = base() - Duration::days(9);

        let sample = recent_random_sample(&cards, cutoff, 5, SortOrder::Desc);
        assert_eq!(sample.len(), 5);
        assert!(sample.iter().all(|c| c.updated >= cutoff));
        assert_eq!(fronts(&sample), vec!["c0", "c1", "c2", "c3", "c4"]);

        let sample = recent_random_sample(&cards, cutoff, 50, SortOrder::Asc);
        assert_eq!(sample.len(), 10);
        assert_eq!(sample[0].front, "c9");
    }

    #[test]
    fn test_recent_sample_with_nothing_recent_is_empty() {
        let cards = vec![card("old", 100, 1)];
        assert!(recent_random_sample(&cards, base(), 10, SortOrder::Desc).is_empty());
    }

    #[test]
    fn test_shuffle_is_permutation_of_subset() {
        let input: Vec<u32> = (0..50).collect();
        for limit in [0, 1, 10, 50, 80] {
            let out = shuffle(input.clone(), limit);
            assert_eq!(out.len(), limit.min(input.len()));
            let unique: HashSet<_> = out.iter().collect();
            assert_eq!(unique.len(), out.len(), "shuffle duplicated an element");
            assert!(out.iter().all(|x| input.contains(x)), "shuffle invented an element");
        }
    }

    #[test]
    fn test_shuffle_orders_vary_between_calls() {
        let input: Vec<u32> = (0..20).collect();
        let orders: HashSet<Vec<u32>> = (0..10).map(|_| shuffle(input.clone(), 20)).collect();
        // 10 draws from 20! orderings; a single distinct order means no randomness
        assert!(orders.len() > 1);
    }
}
