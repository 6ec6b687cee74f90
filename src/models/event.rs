// SPDX-License-Identifier: MIT

//! Calendar event model (group meetups, matches, etc.).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Calendar event document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDoc {
    pub title: String,
    /// Free-form event category (match, meetup, ...)
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub created_by: String,
    pub created_by_name: String,
}

/// User-submitted event data.
#[derive(Debug, Clone, Validate)]
pub struct EventForm {
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: String,
    pub event_type: String,
    pub date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(length(max = 100, message = "location too long"))]
    pub location: String,
    #[validate(length(max = 500, message = "description too long"))]
    pub description: String,
}
