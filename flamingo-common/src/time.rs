//! Timestamp utilities
//!
//! All persisted timestamps are UTC unix milliseconds stored as INTEGER.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Milliseconds in one day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert a timestamp to its stored representation
pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Convert a stored timestamp back to `DateTime<Utc>`
///
/// Out-of-range values clamp to the unix epoch rather than failing.
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// `ts` plus a whole number of days
///
/// Saturates at the representable range; a card parked that far out is
/// simply never due.
pub fn add_days(ts: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|delta| ts.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}
