// SPDX-License-Identifier: MIT

//! Workout record model and the fixed workout-type catalog.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fixed workout category catalog.
///
/// The variant order is the canonical enumeration order: it drives tie-breaks
/// for the "main type" computation and the chart palette assignment, so new
/// types must only ever be appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Soccer,
    Weight,
    Running,
    Walking,
    Cycling,
    Yoga,
    Swimming,
    Hiking,
    Tennis,
    Stairs,
    Crossfit,
    Home,
    Other,
}

/// Chart palette, cyclically indexed by enumeration position.
pub const CHART_COLORS: [&str; 13] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#EC4899",
    "#F97316", "#14B8A6", "#A855F7", "#64748B", "#84CC16", "#6B7280",
];

impl WorkoutType {
    pub const ALL: [WorkoutType; 13] = [
        WorkoutType::Soccer,
        WorkoutType::Weight,
        WorkoutType::Running,
        WorkoutType::Walking,
        WorkoutType::Cycling,
        WorkoutType::Yoga,
        WorkoutType::Swimming,
        WorkoutType::Hiking,
        WorkoutType::Tennis,
        WorkoutType::Stairs,
        WorkoutType::Crossfit,
        WorkoutType::Home,
        WorkoutType::Other,
    ];

    /// Position in the canonical enumeration order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            WorkoutType::Soccer => "Soccer",
            WorkoutType::Weight => "Weight Training",
            WorkoutType::Running => "Running",
            WorkoutType::Walking => "Walking",
            WorkoutType::Cycling => "Cycling",
            WorkoutType::Yoga => "Yoga",
            WorkoutType::Swimming => "Swimming",
            WorkoutType::Hiking => "Hiking",
            WorkoutType::Tennis => "Tennis",
            WorkoutType::Stairs => "Stair Climbing",
            WorkoutType::Crossfit => "CrossFit",
            WorkoutType::Home => "Home Training",
            WorkoutType::Other => "Other",
        }
    }

    /// Icon tag for the frontend icon set.
    pub fn icon(self) -> &'static str {
        match self {
            WorkoutType::Soccer => "i-lucide-target",
            WorkoutType::Weight => "i-lucide-dumbbell",
            WorkoutType::Running => "i-lucide-zap",
            WorkoutType::Walking => "i-lucide-footprints",
            WorkoutType::Cycling => "i-lucide-bike",
            WorkoutType::Yoga => "i-lucide-flower-2",
            WorkoutType::Swimming => "i-lucide-waves",
            WorkoutType::Hiking => "i-lucide-mountain",
            WorkoutType::Tennis => "i-lucide-circle-dot",
            WorkoutType::Stairs => "i-lucide-trending-up",
            WorkoutType::Crossfit => "i-lucide-flame",
            WorkoutType::Home => "i-lucide-house",
            WorkoutType::Other => "i-lucide-activity",
        }
    }

    /// Deterministic chart color for this type.
    pub fn color(self) -> &'static str {
        CHART_COLORS[self.index() % CHART_COLORS.len()]
    }
}

/// Stored workout record.
///
/// `likes` and `comments` are approximate counters mutated only via the
/// store's atomic increment; the authoritative sets live in the `likes` and
/// `comments` collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDoc {
    /// Owner's user id
    pub user_id: String,
    /// Owner's display name (denormalized for feed rendering)
    pub user_name: String,
    /// Owner's photo URL (denormalized)
    pub user_photo: String,
    pub workout_type: WorkoutType,
    /// Calendar day of the workout (midnight local-day granularity)
    pub date: NaiveDate,
    pub image_url: String,
    pub thumbnail_url: String,
    pub memo: String,
    /// Like counter, paired with documents in the `likes` collection
    #[serde(default)]
    pub likes: i64,
    /// Comment counter, paired with documents in the `comments` collection
    #[serde(default)]
    pub comments: i64,
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Snapshot of the author's group memberships at creation time;
    /// not live-updated when memberships change later.
    #[serde(default)]
    pub group_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// User-submitted workout data, validated before insertion.
///
/// Image upload happens outside this crate; the form carries the resulting
/// URLs of the already-uploaded files.
#[derive(Debug, Clone, Validate)]
pub struct WorkoutForm {
    pub workout_type: WorkoutType,
    pub date: NaiveDate,
    pub image_url: String,
    pub thumbnail_url: String,
    #[validate(length(max = 500, message = "memo too long"))]
    pub memo: String,
    #[validate(length(max = 10, message = "too many hashtags"))]
    pub hashtags: Vec<String>,
}
