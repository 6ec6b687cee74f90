// SPDX-License-Identifier: MIT

//! Streak engine: derives longitudinal [`UserStats`] from a user's set of
//! active day-keys.
//!
//! Two policies exist and must never be mixed on the same write path:
//!
//! - [`recompute`] derives everything from the full history and is the
//!   canonical policy. Deletions and out-of-order (backfilled) inserts are
//!   only correct under recompute.
//! - [`apply_incremental`] is a constant-time fast path keyed on the
//!   insertion day ("today" at call time, not the workout's logged date).
//!   It diverges from recompute whenever a record is logged for a past day.

use crate::models::UserStats;
use crate::time_utils::previous_day;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Recompute stats from the full set of distinct active days.
///
/// `total_records` counts records, not days: several workouts on one day
/// count once for the streak but each toward the total.
///
/// `longest_streak` is a running high-water mark seeded with the previously
/// stored value, matching the persisted semantics; use [`longest_run`] for
/// a true historical scan.
pub fn recompute(
    days: &BTreeSet<NaiveDate>,
    total_records: u32,
    today: NaiveDate,
    stored_longest: u32,
) -> UserStats {
    let last_workout_date = days.iter().next_back().copied();

    // Anchor at today if active, else yesterday; otherwise the streak is
    // already broken.
    let yesterday = previous_day(today);
    let anchor = if days.contains(&today) {
        Some(today)
    } else if days.contains(&yesterday) {
        Some(yesterday)
    } else {
        None
    };

    let mut current_streak = 0;
    if let Some(mut day) = anchor {
        while days.contains(&day) {
            current_streak += 1;
            day = previous_day(day);
        }
    }

    UserStats {
        total_workouts: total_records,
        current_streak,
        longest_streak: stored_longest.max(current_streak),
        last_workout_date,
    }
}

/// Length of the longest run of consecutive days anywhere in the history.
///
/// Unlike the persisted high-water mark this scans the actual day set, so a
/// reconciliation pass can detect drift after deletions.
pub fn longest_run(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &day in days {
        run = match prev {
            Some(p) if previous_day(day) == p => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

/// Apply the incremental fast-path update for one record created today.
///
/// Idempotent for the streak on same-day repeats but not for the total:
/// every call increments `total_workouts`.
pub fn apply_incremental(stats: &mut UserStats, today: NaiveDate) {
    let yesterday = previous_day(today);

    match stats.last_workout_date {
        Some(last) if last == today => {} // streak unchanged
        Some(last) if last == yesterday => stats.current_streak += 1,
        _ => stats.current_streak = 1,
    }

    stats.longest_streak = stats.longest_streak.max(stats.current_streak);
    stats.total_workouts += 1;
    stats.last_workout_date = Some(today);
}
