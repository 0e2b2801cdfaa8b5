//! Storage queries for the scheduling engine
//!
//! Every function takes any `SqliteExecutor`, so the same query runs
//! against the pool or inside an open transaction (`&mut *tx`).

pub mod card_groups;
pub mod cards;
pub mod memberships;
pub mod swipes;

pub use card_groups::{add_user_to_group, create_card_group, create_user};
pub use cards::{
    add_card, due_cards, get_card, list_cards_by_group, list_cards_by_group_since, save_card,
};
pub use memberships::{get_membership, upsert_membership_tier};
pub use swipes::{count_interactions, find_recent_interactions, insert_interaction};
