//! User profile and longitudinal stats models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Longitudinal workout statistics, owned by the user profile.
///
/// Recomputed by the streak engine only; never edited directly by callers.
/// Invariants: `longest_streak >= current_streak`, counters non-negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Count of workout records (not distinct days).
    pub total_workouts: u32,
    /// Consecutive active days ending at or adjacent to today.
    pub current_streak: u32,
    /// Running high-water mark of `current_streak`.
    pub longest_streak: u32,
    /// Calendar day of the most recent record, if any.
    pub last_workout_date: Option<NaiveDate>,
}

impl UserStats {
    /// Check the documented stats invariants.
    pub fn is_consistent(&self) -> bool {
        self.longest_streak >= self.current_streak
    }
}

/// User profile document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub photo_url: String,
    /// Identity provider the account was created with
    pub provider: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stats: UserStats,
    /// Groups the user belongs to (mirrors the member subcollections)
    #[serde(default)]
    pub group_ids: Vec<String>,
}

/// Per-month workout goals, stored under
/// `users/{uid}/monthlyGoals/{YYYY-MM}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyGoals {
    /// Target count per workout-type value.
    #[serde(default)]
    pub goals: std::collections::HashMap<String, u32>,
}
