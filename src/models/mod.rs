// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod event;
pub mod group;
pub mod social;
pub mod user;
pub mod workout;

pub use event::{EventDoc, EventForm};
pub use group::{GroupDoc, GroupForm, GroupMemberDoc, GroupRole, GroupUpdateForm};
pub use social::{CommentDoc, FeedFilters, LikeDoc, RankedUser, WorkoutTypeStat};
pub use user::{MonthlyGoals, UserProfile, UserStats};
pub use workout::{WorkoutDoc, WorkoutForm, WorkoutType, CHART_COLORS};
