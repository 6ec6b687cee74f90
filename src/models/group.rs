// SPDX-License-Identifier: MIT

//! Group and group-membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Group document.
///
/// `member_count` mirrors the size of the member subcollection via paired
/// atomic increments. It is eventually consistent with the authoritative
/// member set; correctness-critical code must not rely on its exactness
/// (see `GroupService::reconcile_member_count`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDoc {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub created_by: String,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub member_count: i64,
    pub is_public: bool,
}

/// Member role within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Admin,
    Member,
}

/// Membership record stored under `groups/{groupId}/members/{userId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberDoc {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub photo_url: String,
    pub joined_at: DateTime<Utc>,
    pub role: GroupRole,
}

/// User-submitted group data.
#[derive(Debug, Clone, Validate)]
pub struct GroupForm {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(max = 200, message = "description too long"))]
    pub description: String,
    pub image_url: String,
}

/// Partial edit of a group's display fields; absent fields stay untouched.
#[derive(Debug, Clone, Default, Validate)]
pub struct GroupUpdateForm {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "description too long"))]
    pub description: Option<String>,
    pub image_url: Option<String>,
}
