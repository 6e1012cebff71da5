//! Challenge day and streak arithmetic

use chrono::{DateTime, Utc};

/// Length of a challenge in days
pub const CHALLENGE_DAYS: i32 = 30;

/// Day of the challenge `now` falls on, starting at 1 and capped at 30
///
/// Counts whole 24-hour periods elapsed since `started_at`.
pub fn current_day(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
    let elapsed = (now - started_at).num_days().max(0);
    (elapsed + 1).min(CHALLENGE_DAYS as i64) as i32
}

/// Consecutive completed days ending at `current_day`
///
/// Walks backward from `current_day` and stops at the first day missing from
/// `completed`; an incomplete current day means a streak of zero.
pub fn streak(completed: &[i32], current_day: i32) -> i32 {
    let mut count = 0;
    let mut day = current_day;
    while day >= 1 && completed.contains(&day) {
        count += 1;
        day -= 1;
    }
    count
}

/// Whether `day` is a valid challenge day number
pub fn is_valid_day(day: i64) -> bool {
    (1..=CHALLENGE_DAYS as i64).contains(&day)
}
