// SPDX-License-Identifier: MIT

//! Aggregation engine: reduces workout records into histograms and chart
//! series.
//!
//! All reductions are deterministic for a fixed input: type output follows
//! the canonical enumeration order of [`WorkoutType`], weekday buckets are
//! fixed Mon..Sun, and colors come from the cyclically-indexed palette.

use crate::models::workout::{WorkoutDoc, WorkoutType};
use crate::models::WorkoutTypeStat;
use crate::time_utils::weekday_index;
use std::collections::HashMap;

/// Fixed weekday labels, Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Per-weekday record counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyStats {
    pub labels: [&'static str; 7],
    pub counts: [u32; 7],
}

/// One per-type weekday series for stacked charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayTypeSeries {
    pub workout_type: WorkoutType,
    pub label: &'static str,
    pub color: &'static str,
    pub counts: [u32; 7],
}

/// Share of each workout type across a set of records. Only types with a
/// non-zero count are emitted, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDistribution {
    pub labels: Vec<&'static str>,
    pub counts: Vec<u32>,
    pub colors: Vec<&'static str>,
}

/// Count records per workout type.
pub fn type_counts<'a>(records: impl IntoIterator<Item = &'a WorkoutDoc>) -> HashMap<WorkoutType, u32> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.workout_type).or_insert(0) += 1;
    }
    counts
}

/// The most frequent workout type, ties broken by enumeration order
/// (the earliest type in the catalog wins).
pub fn top_workout_type<'a>(
    records: impl IntoIterator<Item = &'a WorkoutDoc>,
) -> Option<WorkoutType> {
    let counts = type_counts(records);
    let mut top: Option<(WorkoutType, u32)> = None;
    for t in WorkoutType::ALL {
        let Some(&count) = counts.get(&t) else { continue };
        // Strictly greater keeps the earliest type on ties.
        if top.map_or(true, |(_, best)| count > best) {
            top = Some((t, count));
        }
    }
    top.map(|(t, _)| t)
}

/// Per-type stats with display metadata, sorted count descending.
/// The sort is stable over the enumeration-ordered input, so equal counts
/// keep catalog order.
pub fn type_stats<'a>(
    records: impl IntoIterator<Item = &'a WorkoutDoc>,
) -> Vec<WorkoutTypeStat> {
    let counts = type_counts(records);
    let mut stats: Vec<WorkoutTypeStat> = WorkoutType::ALL
        .iter()
        .filter_map(|&t| {
            counts.get(&t).map(|&count| WorkoutTypeStat {
                workout_type: t,
                label: t.label(),
                icon: t.icon(),
                count,
            })
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Type distribution in enumeration order with palette colors.
pub fn type_distribution<'a>(
    records: impl IntoIterator<Item = &'a WorkoutDoc>,
) -> TypeDistribution {
    let counts = type_counts(records);

    let mut distribution = TypeDistribution {
        labels: Vec::new(),
        counts: Vec::new(),
        colors: Vec::new(),
    };
    for t in WorkoutType::ALL {
        let count = counts.get(&t).copied().unwrap_or(0);
        if count > 0 {
            distribution.labels.push(t.label());
            distribution.counts.push(count);
            distribution.colors.push(t.color());
        }
    }
    distribution
}

/// Record counts per weekday, Monday first.
pub fn weekday_counts<'a>(records: impl IntoIterator<Item = &'a WorkoutDoc>) -> WeeklyStats {
    let mut counts = [0u32; 7];
    for record in records {
        counts[weekday_index(record.date)] += 1;
    }
    WeeklyStats {
        labels: WEEKDAY_LABELS,
        counts,
    }
}

/// Weekday counts split per workout type, one series per type present.
pub fn weekday_type_series<'a>(
    records: impl IntoIterator<Item = &'a WorkoutDoc>,
) -> Vec<WeekdayTypeSeries> {
    let mut by_type: HashMap<WorkoutType, [u32; 7]> = HashMap::new();
    for record in records {
        by_type.entry(record.workout_type).or_insert([0; 7])[weekday_index(record.date)] += 1;
    }

    WorkoutType::ALL
        .iter()
        .filter_map(|&t| {
            by_type.get(&t).map(|&counts| WeekdayTypeSeries {
                workout_type: t,
                label: t.label(),
                color: t.color(),
                counts,
            })
        })
        .collect()
}
