// SPDX-License-Identifier: MIT

//! Like, comment, and ranking models.

use crate::models::workout::WorkoutType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Like document. At most one exists per (user, workout) pair; the access
/// layer enforces uniqueness by checking for an existing like before insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeDoc {
    pub workout_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Comment document, belonging to exactly one workout.
/// Displayed in creation-time ascending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDoc {
    pub workout_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_photo: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Per-type count for one user, with display metadata resolved from the
/// workout-type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTypeStat {
    pub workout_type: WorkoutType,
    pub label: &'static str,
    pub icon: &'static str,
    pub count: u32,
}

/// One row of the cross-user ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUser {
    pub user_id: String,
    pub display_name: String,
    pub photo_url: String,
    pub total_workouts: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub main_workout_type: Option<WorkoutTypeStat>,
    pub workout_type_stats: Vec<WorkoutTypeStat>,
    pub last_workout_date: Option<NaiveDate>,
}

/// Filters applied to the workout feed before the pagination cursor.
#[derive(Debug, Clone, Default)]
pub struct FeedFilters {
    pub workout_type: Option<WorkoutType>,
    pub group_id: Option<String>,
}
