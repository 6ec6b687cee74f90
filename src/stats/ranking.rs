// SPDX-License-Identifier: MIT

//! Cross-user ranking reduction.
//!
//! Combines per-user aggregated workout data with the stored longitudinal
//! stats. The reduction is pure; scope resolution (which users and records
//! are considered) happens in `services::rankings`.

use crate::db::Stored;
use crate::models::workout::WorkoutDoc;
use crate::models::{RankedUser, UserProfile};
use crate::stats::aggregate;
use std::collections::HashMap;

/// Which users and records the ranking considers.
#[derive(Debug, Clone)]
pub enum RankingScope {
    /// Every user, every record.
    All,
    /// Members of one group, restricted to records visible in that group.
    Group(String),
    /// Union of the caller's groups' member sets, global stats reported.
    MyGroups(Vec<String>),
}

impl RankingScope {
    /// Whether totals come from the scoped record set instead of the
    /// globally stored stats.
    pub fn is_group_scoped(&self) -> bool {
        matches!(self, RankingScope::Group(_))
    }
}

/// Reduce users plus their (already scope-filtered) records into ranking
/// rows.
///
/// Users with no matching records still appear, with zeroed derived fields.
/// Output order is deterministic: total workouts descending, then current
/// streak descending, then user id ascending.
pub fn rank_users(
    users: &[Stored<UserProfile>],
    records: &[WorkoutDoc],
    group_scoped: bool,
) -> Vec<RankedUser> {
    let mut by_user: HashMap<&str, Vec<&WorkoutDoc>> = HashMap::new();
    for record in records {
        by_user.entry(record.user_id.as_str()).or_default().push(record);
    }

    let mut ranked: Vec<RankedUser> = users
        .iter()
        .map(|user| {
            let user_records = by_user.get(user.id.as_str()).map_or(&[][..], Vec::as_slice);
            let type_stats = aggregate::type_stats(user_records.iter().copied());
            let last_from_records = user_records.iter().map(|r| r.date).max();
            let stats = &user.doc.stats;

            let total_workouts = if group_scoped {
                // Group scope counts only records visible in the group,
                // not the stored global total.
                user_records.len() as u32
            } else {
                stats.total_workouts
            };

            RankedUser {
                user_id: user.id.clone(),
                display_name: user.doc.display_name.clone(),
                photo_url: user.doc.photo_url.clone(),
                total_workouts,
                current_streak: stats.current_streak,
                longest_streak: stats.longest_streak,
                main_workout_type: type_stats.first().cloned(),
                workout_type_stats: type_stats,
                last_workout_date: last_from_records.or(stats.last_workout_date),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_workouts
            .cmp(&a.total_workouts)
            .then_with(|| b.current_streak.cmp(&a.current_streak))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::workout::WorkoutType;
    use crate::models::UserStats;
    use chrono::NaiveDate;

    fn user(id: &str, total: u32, streak: u32) -> Stored<UserProfile> {
        Stored {
            id: id.to_string(),
            doc: UserProfile {
                display_name: format!("User {}", id),
                email: String::new(),
                photo_url: String::new(),
                provider: "google.com".to_string(),
                created_at: chrono::Utc::now(),
                stats: UserStats {
                    total_workouts: total,
                    current_streak: streak,
                    longest_streak: streak,
                    last_workout_date: None,
                },
                group_ids: vec![],
            },
        }
    }

    fn record(user_id: &str, t: WorkoutType, date: &str) -> WorkoutDoc {
        WorkoutDoc {
            user_id: user_id.to_string(),
            user_name: String::new(),
            user_photo: String::new(),
            workout_type: t,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            image_url: String::new(),
            thumbnail_url: String::new(),
            memo: String::new(),
            likes: 0,
            comments: 0,
            hashtags: vec![],
            group_ids: vec![],
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_global_scope_reports_stored_totals() {
        let users = vec![user("a", 10, 2), user("b", 5, 4)];
        let records = vec![record("a", WorkoutType::Running, "2026-08-28")];
        let ranked = rank_users(&users, &records, false);
        assert_eq!(ranked[0].user_id, "a");
        assert_eq!(ranked[0].total_workouts, 10);
        assert_eq!(
            ranked[0].main_workout_type.as_ref().unwrap().workout_type,
            WorkoutType::Running
        );
    }

    #[test]
    fn test_group_scope_counts_scoped_records() {
        let users = vec![user("a", 100, 1)];
        let records = vec![
            record("a", WorkoutType::Yoga, "2026-08-27"),
            record("a", WorkoutType::Yoga, "2026-08-28"),
        ];
        let ranked = rank_users(&users, &records, true);
        assert_eq!(ranked[0].total_workouts, 2);
    }

    #[test]
    fn test_zero_record_users_appear_with_zeroed_fields() {
        let users = vec![user("a", 0, 0)];
        let ranked = rank_users(&users, &[], true);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].total_workouts, 0);
        assert!(ranked[0].main_workout_type.is_none());
        assert!(ranked[0].workout_type_stats.is_empty());
    }

    #[test]
    fn test_output_order_is_deterministic() {
        let users = vec![user("b", 5, 3), user("a", 5, 3), user("c", 9, 0)];
        let ranked = rank_users(&users, &[], false);
        let ids: Vec<_> = ranked.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_last_workout_date_prefers_scoped_records() {
        let mut u = user("a", 1, 1);
        u.doc.stats.last_workout_date =
            Some(NaiveDate::parse_from_str("2026-01-01", "%Y-%m-%d").unwrap());
        let records = vec![record("a", WorkoutType::Hiking, "2026-08-28")];
        let ranked = rank_users(&[u], &records, false);
        assert_eq!(
            ranked[0].last_workout_date,
            Some(NaiveDate::parse_from_str("2026-08-28", "%Y-%m-%d").unwrap())
        );
    }
}
