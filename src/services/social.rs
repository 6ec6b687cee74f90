// SPDX-License-Identifier: MIT

//! Social features: likes, comments, and the paged workout feed.

use crate::db::{collections, Direction, Filter, QuerySpec, Stored};
use crate::error::{AppError, Result};
use crate::models::workout::WorkoutDoc;
use crate::models::{CommentDoc, FeedFilters, LikeDoc};
use crate::pagination::{encode_cursor, parse_cursor, FeedCursor, Page};
use crate::session::SessionContext;
use crate::time_utils::format_day_key;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

const MAX_COMMENT_LENGTH: usize = 500;

/// Likes, comments, and feed paging for one session.
pub struct SocialService {
    ctx: Arc<SessionContext>,
    /// Session cache of the signed-in user's likes: workout id -> like id.
    /// A cache only; the `likes` collection stays authoritative.
    liked: DashMap<String, String>,
}

impl SocialService {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self {
            ctx,
            liked: DashMap::new(),
        }
    }

    // ─── Likes ───────────────────────────────────────────────────

    /// Toggle the signed-in user's like on a workout.
    ///
    /// Returns `true` when the workout is liked after the call. The like
    /// document and the counter increment are paired: a decrement only ever
    /// follows a matching prior increment.
    pub async fn toggle_like(&self, workout_id: &str) -> Result<bool> {
        let user = self.ctx.require_user()?;

        // Consult the store when the cache has no entry; the uniqueness
        // invariant (one like per user per workout) depends on it.
        let existing = match self.liked.get(workout_id) {
            Some(entry) => Some(entry.clone()),
            None => {
                let found: Vec<Stored<LikeDoc>> = self
                    .ctx
                    .db
                    .query_docs(
                        collections::LIKES,
                        QuerySpec::new()
                            .filter(Filter::Eq(
                                "userId".to_string(),
                                Value::from(user.user_id.as_str()),
                            ))
                            .filter(Filter::Eq(
                                "workoutId".to_string(),
                                Value::from(workout_id),
                            ))
                            .limit(1),
                    )
                    .await?;
                found.into_iter().next().map(|like| like.id)
            }
        };

        if let Some(like_id) = existing {
            self.ctx.db.delete_doc(collections::LIKES, &like_id).await?;
            self.ctx
                .db
                .increment(collections::WORKOUTS, workout_id, "likes", -1)
                .await?;
            self.liked.remove(workout_id);
            Ok(false)
        } else {
            let like = LikeDoc {
                workout_id: workout_id.to_string(),
                user_id: user.user_id.clone(),
                created_at: self.ctx.now(),
            };
            let like_id = self.ctx.db.insert_doc(collections::LIKES, &like).await?;
            if let Err(e) = self
                .ctx
                .db
                .increment(collections::WORKOUTS, workout_id, "likes", 1)
                .await
            {
                // Roll the like document back so the pair stays consistent.
                if let Err(rollback) = self.ctx.db.delete_doc(collections::LIKES, &like_id).await {
                    tracing::warn!(
                        workout_id,
                        like_id = %like_id,
                        error = %rollback,
                        "Orphaned like left behind after failed counter increment"
                    );
                }
                return Err(e);
            }
            self.liked.insert(workout_id.to_string(), like_id);
            Ok(true)
        }
    }

    /// Warm the like cache for a set of workouts, chunking the membership
    /// lookup into `in` queries of at most 30 ids.
    pub async fn load_likes_for(&self, workout_ids: &[String]) -> Result<()> {
        let user = self.ctx.require_user()?;
        if workout_ids.is_empty() {
            return Ok(());
        }

        let values: Vec<Value> = workout_ids.iter().map(|id| Value::from(id.as_str())).collect();
        let likes: Vec<Stored<LikeDoc>> = self
            .ctx
            .db
            .query_value_chunks(
                collections::LIKES,
                &[Filter::Eq(
                    "userId".to_string(),
                    Value::from(user.user_id.as_str()),
                )],
                "workoutId",
                &values,
            )
            .await?;

        for like in likes {
            self.liked.insert(like.doc.workout_id, like.id);
        }
        Ok(())
    }

    /// Whether the signed-in user has liked a workout, per the session
    /// cache. Call [`Self::load_likes_for`] first for fetched pages.
    pub fn is_liked(&self, workout_id: &str) -> bool {
        self.liked.contains_key(workout_id)
    }

    /// Recompute the like and comment counters of a workout from the
    /// authoritative sets. Corrects counter drift; returns (likes, comments).
    pub async fn reconcile_workout_counters(&self, workout_id: &str) -> Result<(i64, i64)> {
        let by_workout = QuerySpec::new().filter(Filter::Eq(
            "workoutId".to_string(),
            Value::from(workout_id),
        ));
        let likes: Vec<Stored<LikeDoc>> = self
            .ctx
            .db
            .query_docs(collections::LIKES, by_workout.clone())
            .await?;
        let comments: Vec<Stored<CommentDoc>> = self
            .ctx
            .db
            .query_docs(collections::COMMENTS, by_workout)
            .await?;

        let (like_count, comment_count) = (likes.len() as i64, comments.len() as i64);
        self.ctx
            .db
            .update_fields(
                collections::WORKOUTS,
                workout_id,
                serde_json::json!({ "likes": like_count, "comments": comment_count }),
            )
            .await?;

        tracing::debug!(workout_id, like_count, comment_count, "Counters reconciled");
        Ok((like_count, comment_count))
    }

    // ─── Comments ────────────────────────────────────────────────

    /// Comments of a workout, creation time ascending.
    pub async fn fetch_comments(&self, workout_id: &str) -> Result<Vec<Stored<CommentDoc>>> {
        let mut comments: Vec<Stored<CommentDoc>> = self
            .ctx
            .db
            .query_docs(
                collections::COMMENTS,
                QuerySpec::new().filter(Filter::Eq(
                    "workoutId".to_string(),
                    Value::from(workout_id),
                )),
            )
            .await?;
        comments.sort_by_key(|c| c.doc.created_at);
        Ok(comments)
    }

    /// Add a comment and bump the workout's comment counter.
    pub async fn add_comment(&self, workout_id: &str, content: &str) -> Result<Stored<CommentDoc>> {
        let user = self.ctx.require_user()?;

        let content = content.trim();
        if content.is_empty() || content.len() > MAX_COMMENT_LENGTH {
            return Err(AppError::BadRequest(format!(
                "comment must be 1-{} characters",
                MAX_COMMENT_LENGTH
            )));
        }

        let comment = CommentDoc {
            workout_id: workout_id.to_string(),
            user_id: user.user_id.clone(),
            user_name: user.display_name.clone(),
            user_photo: user.photo_url.clone(),
            content: content.to_string(),
            created_at: self.ctx.now(),
        };
        let comment_id = self.ctx.db.insert_doc(collections::COMMENTS, &comment).await?;
        if let Err(e) = self
            .ctx
            .db
            .increment(collections::WORKOUTS, workout_id, "comments", 1)
            .await
        {
            if let Err(rollback) = self
                .ctx
                .db
                .delete_doc(collections::COMMENTS, &comment_id)
                .await
            {
                tracing::warn!(
                    workout_id,
                    comment_id = %comment_id,
                    error = %rollback,
                    "Orphaned comment left behind after failed counter increment"
                );
            }
            return Err(e);
        }

        Ok(Stored {
            id: comment_id,
            doc: comment,
        })
    }

    /// Delete one's own comment and decrement the workout's counter.
    pub async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        let user = self.ctx.require_user()?;

        let comment: Stored<CommentDoc> = self
            .ctx
            .db
            .get_doc(collections::COMMENTS, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;

        if comment.doc.user_id != user.user_id {
            return Err(AppError::Unauthorized(
                "only the author may delete a comment".to_string(),
            ));
        }

        self.ctx.db.delete_doc(collections::COMMENTS, comment_id).await?;
        self.ctx
            .db
            .increment(collections::WORKOUTS, &comment.doc.workout_id, "comments", -1)
            .await?;
        Ok(())
    }

    // ─── Feed ────────────────────────────────────────────────────

    /// One page of the workout feed, date descending.
    ///
    /// Filters apply before the cursor constraint. `has_more` is true
    /// whenever the page came back full (a documented approximation; an
    /// exactly-full final page yields one extra empty fetch).
    pub async fn feed_page(
        &self,
        cursor: Option<&str>,
        page_size: Option<u32>,
        filters: &FeedFilters,
    ) -> Result<Page<Stored<WorkoutDoc>>> {
        let size = page_size
            .unwrap_or(self.ctx.config.feed_page_size)
            .min(self.ctx.config.max_page_size);
        if size == 0 {
            return Err(AppError::BadRequest("page size must be positive".to_string()));
        }
        let cursor = parse_cursor(cursor)?;

        let mut spec = QuerySpec::new();
        if let Some(workout_type) = filters.workout_type {
            spec = spec.filter(Filter::Eq(
                "workoutType".to_string(),
                serde_json::to_value(workout_type)
                    .map_err(|e| AppError::Store(e.to_string()))?,
            ));
        }
        if let Some(group_id) = &filters.group_id {
            spec = spec.filter(Filter::ArrayContains(
                "groupIds".to_string(),
                Value::from(group_id.as_str()),
            ));
        }
        spec = spec.order_by("date", Direction::Descending).limit(size);
        if let Some(cursor) = &cursor {
            spec = spec.start_after(Value::from(format_day_key(cursor.date)), &cursor.id);
        }

        let items: Vec<Stored<WorkoutDoc>> =
            self.ctx.db.query_docs(collections::WORKOUTS, spec).await?;

        let has_more = items.len() == size as usize;
        let next_cursor = if has_more {
            items.last().map(|last| {
                encode_cursor(&FeedCursor {
                    date: last.doc.date,
                    id: last.id.clone(),
                })
            })
        } else {
            None
        };

        // Warm the like cache for the fetched page (signed-in users only).
        if self.ctx.user().is_some() {
            let ids: Vec<String> = items.iter().map(|w| w.id.clone()).collect();
            self.load_likes_for(&ids).await?;
        }

        Ok(Page {
            items,
            next_cursor,
            has_more,
        })
    }
}
