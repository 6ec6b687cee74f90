// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod events;
pub mod groups;
pub mod rankings;
pub mod social;
pub mod workouts;

pub use events::EventService;
pub use groups::GroupService;
pub use rankings::RankingService;
pub use social::SocialService;
pub use workouts::WorkoutService;
