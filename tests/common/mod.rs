// SPDX-License-Identifier: MIT

//! Shared test fixtures: an in-memory store seeded through the typed
//! datastore, with a clock pinned to a fixed day.

#![allow(dead_code)]

use chrono::NaiveDate;
use fitcrew::config::Config;
use fitcrew::db::{collections, Datastore, DocumentStore, MemoryStore};
use fitcrew::models::workout::{WorkoutDoc, WorkoutType};
use fitcrew::models::{UserProfile, UserStats};
use fitcrew::session::{SessionContext, SessionUser};
use fitcrew::time_utils::FixedClock;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// The fixed "today" all tests run against (a Saturday).
pub const TODAY: &str = "2026-08-29";

/// Opt-in test logging: set `RUST_LOG` (e.g. `fitcrew=debug`) to see the
/// services' tracing output while a test runs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn new_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Session context over a shared store, optionally signed in.
pub fn ctx_with_store(
    store: Arc<dyn DocumentStore>,
    user: Option<(&str, &str)>,
) -> Arc<SessionContext> {
    ctx_with_config(store, user, Config::default())
}

/// Session context with an explicit configuration.
pub fn ctx_with_config(
    store: Arc<dyn DocumentStore>,
    user: Option<(&str, &str)>,
    config: Config,
) -> Arc<SessionContext> {
    init_tracing();
    let db = Datastore::new(store, Duration::from_secs(5));
    let user = user.map(|(id, name)| SessionUser {
        user_id: id.to_string(),
        display_name: name.to_string(),
        photo_url: String::new(),
    });
    Arc::new(SessionContext::new(
        config,
        db,
        Arc::new(FixedClock(d(TODAY))),
        user,
    ))
}

/// Fresh store plus a signed-in session context.
pub fn signed_in_ctx(user_id: &str, name: &str) -> (Arc<SessionContext>, Arc<MemoryStore>) {
    let store = new_store();
    let ctx = ctx_with_store(store.clone(), Some((user_id, name)));
    (ctx, store)
}

/// Seed a user profile with default (zeroed) stats.
pub async fn seed_user(ctx: &SessionContext, user_id: &str, name: &str) {
    seed_user_with_stats(ctx, user_id, name, UserStats::default()).await;
}

pub async fn seed_user_with_stats(
    ctx: &SessionContext,
    user_id: &str,
    name: &str,
    stats: UserStats,
) {
    let profile = UserProfile {
        display_name: name.to_string(),
        email: format!("{}@example.com", user_id),
        photo_url: String::new(),
        provider: "google.com".to_string(),
        created_at: ctx.now(),
        stats,
        group_ids: vec![],
    };
    ctx.db
        .set_doc(collections::USERS, user_id, &profile)
        .await
        .unwrap();
}

/// Insert a workout record directly (bypassing the service, so tests can
/// seed without touching stats).
pub async fn seed_workout(
    ctx: &SessionContext,
    user_id: &str,
    workout_type: WorkoutType,
    date: &str,
    group_ids: &[&str],
) -> String {
    let doc = WorkoutDoc {
        user_id: user_id.to_string(),
        user_name: user_id.to_string(),
        user_photo: String::new(),
        workout_type,
        date: d(date),
        image_url: String::new(),
        thumbnail_url: String::new(),
        memo: String::new(),
        likes: 0,
        comments: 0,
        hashtags: vec![],
        group_ids: group_ids.iter().map(|s| s.to_string()).collect(),
        created_at: ctx.now(),
    };
    ctx.db
        .insert_doc(collections::WORKOUTS, &doc)
        .await
        .unwrap()
}
