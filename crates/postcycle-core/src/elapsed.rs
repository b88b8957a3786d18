//! Elapsed-time evaluation
//!
//! Whole days between a reference timestamp and now, rounded to the nearest
//! day so that a post published 23.6 hours ago counts as one day old.

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Rounded number of days from `reference` to `now`.
///
/// Halves round up (towards positive infinity), so 1.5 days is 2 and
/// -1.5 days is -1.
pub fn elapsed_days(now: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let millis = (now - reference).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY + 0.5).floor() as i64
}
