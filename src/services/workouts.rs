// SPDX-License-Identifier: MIT

//! Workout lifecycle and per-user statistics service.
//!
//! Owns the two stats entry points: the authoritative full recompute and
//! the incremental fast path. Creation and deletion both run the full
//! recompute; deletion must (removal is only correct against the full
//! history), creation does so that backfilled past-dated records land
//! correctly.

use crate::db::{collections, Direction, Filter, QuerySpec, Stored};
use crate::error::{AppError, Result};
use crate::models::workout::{WorkoutDoc, WorkoutForm, WorkoutType};
use crate::models::{CommentDoc, LikeDoc, UserStats};
use crate::session::SessionContext;
use crate::stats::aggregate::{self, TypeDistribution, WeekdayTypeSeries, WeeklyStats};
use crate::stats::streak;
use crate::time_utils::{format_day_key, month_key, week_start};
use chrono::{Datelike, Months};
use futures_util::{stream, StreamExt};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use validator::Validate;

/// Bound on concurrent store calls during cascade deletes.
const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Workout records and stats operations for one session.
pub struct WorkoutService {
    ctx: Arc<SessionContext>,
}

impl WorkoutService {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    // ─── Lifecycle ───────────────────────────────────────────────

    /// Create a workout record and recompute the owner's stats.
    ///
    /// The record carries a snapshot of the author's group memberships at
    /// creation time; later joins and leaves do not rewrite it.
    pub async fn add_workout(&self, form: WorkoutForm) -> Result<String> {
        let user = self.ctx.require_user()?;
        form.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let group_ids = self
            .ctx
            .db
            .get_user(&user.user_id)
            .await?
            .map(|profile| profile.group_ids)
            .unwrap_or_default();

        let doc = WorkoutDoc {
            user_id: user.user_id.clone(),
            user_name: user.display_name.clone(),
            user_photo: user.photo_url.clone(),
            workout_type: form.workout_type,
            date: form.date,
            image_url: form.image_url,
            thumbnail_url: form.thumbnail_url,
            memo: form.memo,
            likes: 0,
            comments: 0,
            hashtags: form.hashtags,
            group_ids,
            created_at: self.ctx.now(),
        };

        let workout_id = self.ctx.db.insert_doc(collections::WORKOUTS, &doc).await?;
        tracing::info!(
            user_id = %user.user_id,
            workout_id = %workout_id,
            workout_type = ?doc.workout_type,
            date = %doc.date,
            "Workout created"
        );

        // Full recompute, not the incremental path: the logged date may be
        // in the past, which the incremental update cannot represent.
        self.recompute_stats(&user.user_id).await?;

        Ok(workout_id)
    }

    /// Delete a workout together with its comments and likes, then
    /// recompute the owner's stats.
    ///
    /// Only the owner may delete. If some cascade steps fail the operation
    /// surfaces `PartialCascade` and skips the stats recompute; orphaned
    /// documents must then be cleaned up out of band.
    pub async fn delete_workout(&self, workout_id: &str) -> Result<()> {
        let user = self.ctx.require_user()?;

        let workout: Stored<WorkoutDoc> = self
            .ctx
            .db
            .get_doc(collections::WORKOUTS, workout_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("workout {}", workout_id)))?;

        if workout.doc.user_id != user.user_id {
            return Err(AppError::Unauthorized(
                "only the owner may delete a workout".to_string(),
            ));
        }

        let by_workout = QuerySpec::new().filter(Filter::Eq(
            "workoutId".to_string(),
            Value::from(workout_id),
        ));
        let comments: Vec<Stored<CommentDoc>> = self
            .ctx
            .db
            .query_docs(collections::COMMENTS, by_workout.clone())
            .await?;
        let likes: Vec<Stored<LikeDoc>> = self
            .ctx
            .db
            .query_docs(collections::LIKES, by_workout)
            .await?;

        let mut targets: Vec<(&'static str, String)> = Vec::new();
        targets.extend(comments.into_iter().map(|c| (collections::COMMENTS, c.id)));
        targets.extend(likes.into_iter().map(|l| (collections::LIKES, l.id)));
        targets.push((collections::WORKOUTS, workout_id.to_string()));

        let total = targets.len();
        let results: Vec<Result<()>> = stream::iter(targets)
            .map(|(collection, id)| {
                let db = self.ctx.db.clone();
                async move { db.delete_doc(collection, &id).await }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::error!(
                workout_id,
                failed,
                total,
                "Cascade delete left orphaned documents"
            );
            return Err(AppError::PartialCascade {
                deleted: total - failed,
                failed,
            });
        }

        tracing::info!(user_id = %user.user_id, workout_id, total, "Workout cascade deleted");

        self.recompute_stats(&user.user_id).await?;
        Ok(())
    }

    // ─── Stats Entry Points ──────────────────────────────────────

    /// Authoritative stats recompute from the user's full workout history.
    pub async fn recompute_stats(&self, user_id: &str) -> Result<UserStats> {
        let profile = self
            .ctx
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

        let workouts = self.ctx.db.workouts_for_user(user_id).await?;
        let days: BTreeSet<_> = workouts.iter().map(|w| w.doc.date).collect();

        let stats = streak::recompute(
            &days,
            workouts.len() as u32,
            self.ctx.today(),
            profile.stats.longest_streak,
        );

        self.ctx.db.set_user_stats(user_id, &stats).await?;
        tracing::debug!(
            user_id,
            total = stats.total_workouts,
            streak = stats.current_streak,
            "Stats recomputed"
        );
        Ok(stats)
    }

    /// Incremental fast-path update for a record created today.
    ///
    /// Cheaper than the full recompute but only valid when the new record
    /// is dated today; any out-of-order insert invalidates it and requires
    /// [`Self::recompute_stats`].
    pub async fn apply_incremental_stats(&self, user_id: &str) -> Result<UserStats> {
        let profile = self
            .ctx
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

        let mut stats = profile.stats;
        streak::apply_incremental(&mut stats, self.ctx.today());

        self.ctx.db.set_user_stats(user_id, &stats).await?;
        Ok(stats)
    }

    // ─── Queries ─────────────────────────────────────────────────

    /// The signed-in user's workouts for today, newest first.
    pub async fn today_workouts(&self) -> Result<Vec<Stored<WorkoutDoc>>> {
        let user = self.ctx.require_user()?;
        self.ctx
            .db
            .query_docs(
                collections::WORKOUTS,
                QuerySpec::new()
                    .filter(Filter::Eq(
                        "userId".to_string(),
                        Value::from(user.user_id.as_str()),
                    ))
                    .filter(Filter::Eq(
                        "date".to_string(),
                        Value::from(format_day_key(self.ctx.today())),
                    ))
                    .order_by("createdAt", Direction::Descending),
            )
            .await
    }

    /// The signed-in user's most recent workouts.
    pub async fn recent_workouts(&self, count: u32) -> Result<Vec<Stored<WorkoutDoc>>> {
        let user = self.ctx.require_user()?;
        self.ctx
            .db
            .query_docs(
                collections::WORKOUTS,
                QuerySpec::new()
                    .filter(Filter::Eq(
                        "userId".to_string(),
                        Value::from(user.user_id.as_str()),
                    ))
                    .order_by("date", Direction::Descending)
                    .limit(count),
            )
            .await
    }

    /// Fetch one workout by id.
    pub async fn workout_by_id(&self, workout_id: &str) -> Result<Option<Stored<WorkoutDoc>>> {
        self.ctx.db.get_doc(collections::WORKOUTS, workout_id).await
    }

    async fn current_week_workouts(&self) -> Result<Vec<Stored<WorkoutDoc>>> {
        let user = self.ctx.require_user()?;
        let monday = week_start(self.ctx.today());
        self.ctx
            .db
            .query_docs(
                collections::WORKOUTS,
                QuerySpec::new()
                    .filter(Filter::Eq(
                        "userId".to_string(),
                        Value::from(user.user_id.as_str()),
                    ))
                    .filter(Filter::Gte(
                        "date".to_string(),
                        Value::from(format_day_key(monday)),
                    ))
                    .order_by("date", Direction::Ascending),
            )
            .await
    }

    /// Per-weekday counts for the current week (Monday start).
    pub async fn weekly_stats(&self) -> Result<WeeklyStats> {
        let workouts = self.current_week_workouts().await?;
        Ok(aggregate::weekday_counts(workouts.iter().map(|w| &w.doc)))
    }

    /// Per-weekday, per-type series for the current week.
    pub async fn weekly_type_stats(&self) -> Result<Vec<WeekdayTypeSeries>> {
        let workouts = self.current_week_workouts().await?;
        Ok(aggregate::weekday_type_series(
            workouts.iter().map(|w| &w.doc),
        ))
    }

    /// Type distribution across all of the user's records.
    pub async fn type_distribution(&self) -> Result<TypeDistribution> {
        let user = self.ctx.require_user()?;
        let workouts = self.ctx.db.workouts_for_user(&user.user_id).await?;
        Ok(aggregate::type_distribution(
            workouts.iter().map(|w| &w.doc),
        ))
    }

    /// The user's most frequent workout type, if any.
    pub async fn top_workout_type(&self) -> Result<Option<WorkoutType>> {
        let user = self.ctx.require_user()?;
        let workouts = self.ctx.db.workouts_for_user(&user.user_id).await?;
        Ok(aggregate::top_workout_type(
            workouts.iter().map(|w| &w.doc),
        ))
    }

    // ─── Monthly Goals ───────────────────────────────────────────

    /// Per-type record counts for the current month.
    pub async fn monthly_type_counts(&self) -> Result<HashMap<String, u32>> {
        let user = self.ctx.require_user()?;
        let today = self.ctx.today();
        let month_start = today.with_day0(0).unwrap_or(today);
        let next_month = month_start
            .checked_add_months(Months::new(1))
            .unwrap_or(month_start);

        let workouts: Vec<Stored<WorkoutDoc>> = self
            .ctx
            .db
            .query_docs(
                collections::WORKOUTS,
                QuerySpec::new()
                    .filter(Filter::Eq(
                        "userId".to_string(),
                        Value::from(user.user_id.as_str()),
                    ))
                    .filter(Filter::Gte(
                        "date".to_string(),
                        Value::from(format_day_key(month_start)),
                    ))
                    .filter(Filter::Lte(
                        "date".to_string(),
                        Value::from(format_day_key(crate::time_utils::previous_day(next_month))),
                    )),
            )
            .await?;

        let counts = aggregate::type_counts(workouts.iter().map(|w| &w.doc));
        Ok(counts
            .into_iter()
            .map(|(t, count)| {
                let value = serde_json::to_value(t)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                (value, count)
            })
            .collect())
    }

    /// The user's goals for the current month.
    pub async fn monthly_goals(&self) -> Result<HashMap<String, u32>> {
        let user = self.ctx.require_user()?;
        let key = month_key(self.ctx.today());
        let goals = self
            .ctx
            .db
            .get_doc::<crate::models::MonthlyGoals>(
                &collections::monthly_goals(&user.user_id),
                &key,
            )
            .await?;
        Ok(goals.map(|g| g.doc.goals).unwrap_or_default())
    }

    /// Replace the user's goals for the current month.
    pub async fn save_monthly_goals(&self, goals: HashMap<String, u32>) -> Result<()> {
        let user = self.ctx.require_user()?;
        let key = month_key(self.ctx.today());
        self.ctx
            .db
            .set_doc(
                &collections::monthly_goals(&user.user_id),
                &key,
                &crate::models::MonthlyGoals { goals },
            )
            .await
    }
}
