// SPDX-License-Identifier: MIT

//! Pure computational core: streak math, aggregation, ranking reduction.

pub mod aggregate;
pub mod ranking;
pub mod streak;

pub use aggregate::{TypeDistribution, WeekdayTypeSeries, WeeklyStats, WEEKDAY_LABELS};
pub use ranking::RankingScope;
