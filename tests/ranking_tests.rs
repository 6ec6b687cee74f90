// SPDX-License-Identifier: MIT

//! Ranking tests: scope resolution plus the deterministic ordering of the
//! reduction, run against the in-memory store.

mod common;

use chrono::{TimeZone, Utc};
use common::{d, seed_user, seed_user_with_stats, seed_workout, signed_in_ctx, TODAY};
use fitcrew::db::collections;
use fitcrew::models::workout::WorkoutType;
use fitcrew::models::{GroupMemberDoc, GroupRole, UserStats};
use fitcrew::services::RankingService;
use fitcrew::session::SessionContext;
use fitcrew::stats::ranking::RankingScope;

async fn seed_member(ctx: &SessionContext, group_id: &str, user_id: &str) {
    let member = GroupMemberDoc {
        user_id: user_id.to_string(),
        display_name: user_id.to_string(),
        photo_url: String::new(),
        joined_at: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
        role: GroupRole::Member,
    };
    ctx.db
        .set_doc(&collections::group_members(group_id), user_id, &member)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_all_scope_orders_by_total_then_streak_then_id() {
    let (ctx, _store) = signed_in_ctx("viewer", "Viewer");
    seed_user_with_stats(
        &ctx,
        "a",
        "Ana",
        UserStats {
            total_workouts: 5,
            current_streak: 1,
            longest_streak: 3,
            last_workout_date: Some(d(TODAY)),
        },
    )
    .await;
    seed_user_with_stats(
        &ctx,
        "b",
        "Ben",
        UserStats {
            total_workouts: 5,
            current_streak: 4,
            longest_streak: 4,
            last_workout_date: Some(d(TODAY)),
        },
    )
    .await;
    seed_user_with_stats(
        &ctx,
        "c",
        "Cleo",
        UserStats {
            total_workouts: 9,
            current_streak: 0,
            longest_streak: 2,
            last_workout_date: Some(d("2026-08-20")),
        },
    )
    .await;

    let rows = RankingService::new(ctx)
        .aggregate_rankings(RankingScope::All)
        .await
        .unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.user_id.as_str()).collect();
    // c wins on total; a and b tie on total, b wins on streak.
    assert_eq!(order, vec!["c", "b", "a"]);
}

#[tokio::test]
async fn test_all_scope_equal_users_tie_break_on_id() {
    let (ctx, _store) = signed_in_ctx("viewer", "Viewer");
    for id in ["z", "m", "a"] {
        seed_user(&ctx, id, id).await;
    }

    let rows = RankingService::new(ctx)
        .aggregate_rankings(RankingScope::All)
        .await
        .unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(order, vec!["a", "m", "z"]);
}

#[tokio::test]
async fn test_group_scope_counts_only_group_visible_records() {
    let (ctx, _store) = signed_in_ctx("viewer", "Viewer");
    // Stored totals say "a" has 10 workouts, but only 2 carry the group id.
    seed_user_with_stats(
        &ctx,
        "a",
        "Ana",
        UserStats {
            total_workouts: 10,
            current_streak: 3,
            longest_streak: 5,
            last_workout_date: Some(d(TODAY)),
        },
    )
    .await;
    seed_user(&ctx, "b", "Ben").await;
    seed_member(&ctx, "g1", "a").await;
    seed_member(&ctx, "g1", "b").await;

    seed_workout(&ctx, "a", WorkoutType::Running, "2026-08-20", &["g1"]).await;
    seed_workout(&ctx, "a", WorkoutType::Running, "2026-08-21", &["g1"]).await;
    seed_workout(&ctx, "a", WorkoutType::Running, "2026-08-22", &[]).await;
    seed_workout(&ctx, "b", WorkoutType::Yoga, TODAY, &["g1"]).await;

    let rows = RankingService::new(ctx)
        .aggregate_rankings(RankingScope::Group("g1".to_string()))
        .await
        .unwrap();

    let a = rows.iter().find(|r| r.user_id == "a").unwrap();
    assert_eq!(a.total_workouts, 2);
    assert_eq!(a.last_workout_date, Some(d("2026-08-21")));
    // Streaks stay the stored per-user values even in group scope.
    assert_eq!(a.current_streak, 3);

    let b = rows.iter().find(|r| r.user_id == "b").unwrap();
    assert_eq!(b.total_workouts, 1);
}

#[tokio::test]
async fn test_group_scope_includes_zero_record_members() {
    let (ctx, _store) = signed_in_ctx("viewer", "Viewer");
    seed_user(&ctx, "a", "Ana").await;
    seed_user(&ctx, "b", "Ben").await;
    seed_member(&ctx, "g1", "a").await;
    seed_member(&ctx, "g1", "b").await;
    seed_workout(&ctx, "a", WorkoutType::Soccer, TODAY, &["g1"]).await;

    let rows = RankingService::new(ctx)
        .aggregate_rankings(RankingScope::Group("g1".to_string()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    let b = rows.iter().find(|r| r.user_id == "b").unwrap();
    assert_eq!(b.total_workouts, 0);
    assert!(b.main_workout_type.is_none());
}

#[tokio::test]
async fn test_group_scope_empty_group_yields_no_rows() {
    let (ctx, _store) = signed_in_ctx("viewer", "Viewer");
    let rows = RankingService::new(ctx)
        .aggregate_rankings(RankingScope::Group("empty".to_string()))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_my_groups_scope_unions_members_with_global_stats() {
    let (ctx, _store) = signed_in_ctx("viewer", "Viewer");
    seed_user_with_stats(
        &ctx,
        "a",
        "Ana",
        UserStats {
            total_workouts: 7,
            current_streak: 2,
            longest_streak: 2,
            last_workout_date: Some(d(TODAY)),
        },
    )
    .await;
    seed_user(&ctx, "b", "Ben").await;
    seed_user(&ctx, "c", "Cleo").await;
    // "a" is in both groups; the union must not duplicate the row.
    seed_member(&ctx, "g1", "a").await;
    seed_member(&ctx, "g1", "b").await;
    seed_member(&ctx, "g2", "a").await;
    seed_member(&ctx, "g2", "c").await;

    // A record with no group ids still feeds the main-type derivation:
    // this scope ranks members by their global activity.
    seed_workout(&ctx, "a", WorkoutType::Running, TODAY, &[]).await;
    seed_workout(&ctx, "b", WorkoutType::Weight, TODAY, &["g1"]).await;

    let rows = RankingService::new(ctx)
        .aggregate_rankings(RankingScope::MyGroups(vec![
            "g1".to_string(),
            "g2".to_string(),
        ]))
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    let a = rows.iter().find(|r| r.user_id == "a").unwrap();
    // Stored global total, not the scoped record count.
    assert_eq!(a.total_workouts, 7);
    assert_eq!(
        a.main_workout_type.as_ref().unwrap().workout_type,
        WorkoutType::Running
    );
}

#[tokio::test]
async fn test_ranking_resolves_main_type_from_records() {
    let (ctx, _store) = signed_in_ctx("viewer", "Viewer");
    seed_user(&ctx, "a", "Ana").await;
    seed_workout(&ctx, "a", WorkoutType::Cycling, "2026-08-25", &[]).await;
    seed_workout(&ctx, "a", WorkoutType::Cycling, "2026-08-26", &[]).await;
    seed_workout(&ctx, "a", WorkoutType::Yoga, "2026-08-27", &[]).await;

    let rows = RankingService::new(ctx)
        .aggregate_rankings(RankingScope::All)
        .await
        .unwrap();
    let a = &rows[0];
    let main = a.main_workout_type.as_ref().unwrap();
    assert_eq!(main.workout_type, WorkoutType::Cycling);
    assert_eq!(main.count, 2);
    assert_eq!(a.workout_type_stats.len(), 2);
}
