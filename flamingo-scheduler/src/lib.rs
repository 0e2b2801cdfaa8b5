//! Review scheduling engine
//!
//! Decides, after each swipe, how a card's review interval moves and which
//! engagement tier the user has reached in the card group, then picks the
//! next cards to present.
//!
//! - [`ladder`]: interval progression
//! - [`strategy`]: tier selection over recent history
//! - [`batch`]: how many and which cards to serve
//! - [`orchestrator`]: one atomic transition per interaction
//! - [`db`]: storage queries

pub mod batch;
pub mod config;
pub mod db;
pub mod error;
pub mod ladder;
pub mod orchestrator;
pub mod strategy;

pub use batch::determine_card_amount;
pub use config::SchedulerConfig;
pub use error::{Error, Result};
pub use ladder::IntervalLadder;
pub use orchestrator::{apply_transition, InteractionInput, SwipeOrchestrator, Transition};
pub use strategy::{select_strategy, History, TierStrategy, TierThresholds};
