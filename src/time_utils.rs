// SPDX-License-Identifier: MIT

//! Day-key helpers for streak and weekly aggregation.
//!
//! A day-key is a calendar date in the user's local timezone; one or many
//! workouts on the same day-key count as one "active day".

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc};

/// Day-key wire format (`YYYY-MM-DD`). Sorts lexicographically in
/// chronological order, which the store's ordering relies on.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Normalize an instant to its local calendar date.
pub fn local_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Index of a date's weekday with Monday = 0 .. Sunday = 6.
///
/// Equivalent to `(sunday_zero_index + 6) % 7` on a Sunday=0 native
/// representation; the fixed Mon..Sun bucket order keeps chart output
/// deterministic.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// The calendar day immediately before `date`.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    // NaiveDate::MIN is far outside any workout date, so this never fails
    // in practice; saturate rather than panic.
    date.checked_sub_days(Days::new(1)).unwrap_or(NaiveDate::MIN)
}

/// Monday of the week containing `date` (weeks start on Monday).
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(weekday_index(date) as u64))
        .unwrap_or(NaiveDate::MIN)
}

/// Format a day-key for storage.
pub fn format_day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a stored day-key.
pub fn parse_day_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_KEY_FORMAT).ok()
}

/// Month key (`YYYY-MM`) used for monthly goals and counters.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Time source abstraction so streak math is testable against a fixed day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The current local calendar day.
    fn today(&self) -> NaiveDate {
        local_day(self.now())
    }
}

/// Production clock backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed day, for tests.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        // Noon avoids any edge around local-midnight conversion.
        self.0
            .and_hms_opt(12, 0, 0)
            .expect("valid time")
            .and_utc()
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}
