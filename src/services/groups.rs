// SPDX-License-Identifier: MIT

//! Group membership service.
//!
//! `member_count` on the group document mirrors the member subcollection
//! via paired increments. Multi-document writes (create, join, leave) are
//! separate store calls; `create_group` compensates on failure instead of
//! leaving a half-created group behind.

use crate::db::{collections, Direction, Filter, QuerySpec, Stored};
use crate::error::{AppError, Result};
use crate::models::{GroupDoc, GroupForm, GroupMemberDoc, GroupRole, GroupUpdateForm};
use crate::session::SessionContext;
use futures_util::{stream, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Group operations for one session.
pub struct GroupService {
    ctx: Arc<SessionContext>,
}

impl GroupService {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    // ─── Queries ─────────────────────────────────────────────────

    /// All public groups, largest first.
    pub async fn all_groups(&self) -> Result<Vec<Stored<GroupDoc>>> {
        self.ctx
            .db
            .query_docs(
                collections::GROUPS,
                QuerySpec::new()
                    .filter(Filter::Eq("isPublic".to_string(), Value::from(true)))
                    .order_by("memberCount", Direction::Descending),
            )
            .await
    }

    /// The signed-in user's groups, resolved from the profile's group-id
    /// list via chunked id lookups.
    pub async fn my_groups(&self) -> Result<Vec<Stored<GroupDoc>>> {
        let user = self.ctx.require_user()?;
        let Some(profile) = self.ctx.db.get_user(&user.user_id).await? else {
            return Ok(Vec::new());
        };
        if profile.group_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.ctx
            .db
            .get_by_ids(collections::GROUPS, &profile.group_ids)
            .await
    }

    pub async fn group_by_id(&self, group_id: &str) -> Result<Option<Stored<GroupDoc>>> {
        self.ctx.db.get_doc(collections::GROUPS, group_id).await
    }

    /// Members of a group, join time ascending.
    pub async fn members(&self, group_id: &str) -> Result<Vec<Stored<GroupMemberDoc>>> {
        self.ctx
            .db
            .query_docs(
                &collections::group_members(group_id),
                QuerySpec::new().order_by("joinedAt", Direction::Ascending),
            )
            .await
    }

    /// Whether the signed-in user is an admin of the group.
    pub async fn is_admin_of(&self, group_id: &str) -> Result<bool> {
        let user = self.ctx.require_user()?;
        let member: Option<Stored<GroupMemberDoc>> = self
            .ctx
            .db
            .get_doc(&collections::group_members(group_id), &user.user_id)
            .await?;
        Ok(member.is_some_and(|m| m.doc.role == GroupRole::Admin))
    }

    // ─── Membership Mutations ────────────────────────────────────

    /// Create a group with the caller as its admin member.
    ///
    /// Three separate writes (group doc, admin member doc, profile
    /// group-id patch); on failure of a later step the earlier ones are
    /// compensated so no half-created group remains.
    pub async fn create_group(&self, form: GroupForm) -> Result<String> {
        let user = self.ctx.require_user()?;
        form.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let group = GroupDoc {
            name: form.name,
            description: form.description,
            image_url: form.image_url,
            created_by: user.user_id.clone(),
            created_by_name: user.display_name.clone(),
            created_at: self.ctx.now(),
            member_count: 1,
            is_public: true,
        };
        let group_id = self.ctx.db.insert_doc(collections::GROUPS, &group).await?;

        let admin = GroupMemberDoc {
            user_id: user.user_id.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            joined_at: self.ctx.now(),
            role: GroupRole::Admin,
        };
        if let Err(e) = self
            .ctx
            .db
            .set_doc(&collections::group_members(&group_id), &user.user_id, &admin)
            .await
        {
            self.compensate_create(&group_id, &user.user_id, false).await;
            return Err(e);
        }

        if let Err(e) = self
            .patch_group_ids(&user.user_id, |ids| {
                push_unique(ids, &group_id);
            })
            .await
        {
            self.compensate_create(&group_id, &user.user_id, true).await;
            return Err(e);
        }

        tracing::info!(group_id = %group_id, user_id = %user.user_id, "Group created");
        Ok(group_id)
    }

    /// Undo the steps of a failed group creation, best effort.
    async fn compensate_create(&self, group_id: &str, user_id: &str, member_created: bool) {
        if member_created {
            if let Err(e) = self
                .ctx
                .db
                .delete_doc(&collections::group_members(group_id), user_id)
                .await
            {
                tracing::warn!(group_id, error = %e, "Compensation failed: member doc remains");
            }
        }
        if let Err(e) = self.ctx.db.delete_doc(collections::GROUPS, group_id).await {
            tracing::warn!(group_id, error = %e, "Compensation failed: group doc remains");
        }
    }

    /// Edit a group's display fields. Admin only; absent fields are left
    /// untouched.
    pub async fn update_group(&self, group_id: &str, form: GroupUpdateForm) -> Result<()> {
        form.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if !self.is_admin_of(group_id).await? {
            return Err(AppError::Unauthorized(
                "only a group admin may edit the group".to_string(),
            ));
        }

        let mut patch = serde_json::Map::new();
        if let Some(name) = form.name {
            patch.insert("name".to_string(), Value::from(name));
        }
        if let Some(description) = form.description {
            patch.insert("description".to_string(), Value::from(description));
        }
        if let Some(image_url) = form.image_url {
            patch.insert("imageUrl".to_string(), Value::from(image_url));
        }
        if patch.is_empty() {
            return Ok(());
        }

        self.ctx
            .db
            .update_fields(collections::GROUPS, group_id, Value::Object(patch))
            .await?;
        tracing::info!(group_id, "Group updated");
        Ok(())
    }

    /// Join a public group. Fails with `AlreadyExists` on a duplicate join.
    pub async fn join_group(&self, group_id: &str) -> Result<()> {
        let user = self.ctx.require_user()?;

        self.ctx
            .db
            .get_doc::<GroupDoc>(collections::GROUPS, group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group {}", group_id)))?;

        let members = collections::group_members(group_id);
        let existing: Option<Stored<GroupMemberDoc>> =
            self.ctx.db.get_doc(&members, &user.user_id).await?;
        if existing.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "already a member of group {}",
                group_id
            )));
        }

        let member = GroupMemberDoc {
            user_id: user.user_id.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            joined_at: self.ctx.now(),
            role: GroupRole::Member,
        };
        self.ctx.db.set_doc(&members, &user.user_id, &member).await?;
        self.ctx
            .db
            .increment(collections::GROUPS, group_id, "memberCount", 1)
            .await?;
        self.patch_group_ids(&user.user_id, |ids| {
            push_unique(ids, group_id);
        })
        .await?;

        tracing::info!(group_id, user_id = %user.user_id, "Joined group");
        Ok(())
    }

    /// Join the configured default group, if one is set. Meant for account
    /// setup; an existing membership is not an error. Returns the group id
    /// that was joined (or already held).
    pub async fn join_default_group(&self) -> Result<Option<String>> {
        let Some(group_id) = self.ctx.config.default_group_id.clone() else {
            return Ok(None);
        };
        match self.join_group(&group_id).await {
            Ok(()) | Err(AppError::AlreadyExists(_)) => Ok(Some(group_id)),
            Err(e) => Err(e),
        }
    }

    /// Leave a group.
    pub async fn leave_group(&self, group_id: &str) -> Result<()> {
        let user = self.ctx.require_user()?;

        self.ctx
            .db
            .delete_doc(&collections::group_members(group_id), &user.user_id)
            .await?;
        self.ctx
            .db
            .increment(collections::GROUPS, group_id, "memberCount", -1)
            .await?;
        self.patch_group_ids(&user.user_id, |ids| {
            ids.retain(|id| id != group_id);
        })
        .await?;

        tracing::info!(group_id, user_id = %user.user_id, "Left group");
        Ok(())
    }

    /// Remove another member from the group. Admin only.
    pub async fn remove_member(&self, group_id: &str, target_user_id: &str) -> Result<()> {
        if !self.is_admin_of(group_id).await? {
            return Err(AppError::Unauthorized(
                "only a group admin may remove members".to_string(),
            ));
        }

        self.ctx
            .db
            .delete_doc(&collections::group_members(group_id), target_user_id)
            .await?;
        self.ctx
            .db
            .increment(collections::GROUPS, group_id, "memberCount", -1)
            .await?;
        // The target may have no profile anymore; skip the patch then.
        if self.ctx.db.get_user(target_user_id).await?.is_some() {
            self.patch_group_ids(target_user_id, |ids| {
                ids.retain(|id| id != group_id);
            })
            .await?;
        }

        tracing::info!(group_id, target_user_id, "Member removed");
        Ok(())
    }

    /// Change a member's role. Admin only.
    pub async fn set_member_role(
        &self,
        group_id: &str,
        target_user_id: &str,
        role: GroupRole,
    ) -> Result<()> {
        if !self.is_admin_of(group_id).await? {
            return Err(AppError::Unauthorized(
                "only a group admin may change roles".to_string(),
            ));
        }
        self.ctx
            .db
            .update_fields(
                &collections::group_members(group_id),
                target_user_id,
                serde_json::json!({ "role": serde_json::to_value(role).map_err(|e| AppError::Store(e.to_string()))? }),
            )
            .await
    }

    /// Delete a group. Admin only; the member subcollection is emptied
    /// first so no group with members is ever deleted.
    pub async fn delete_group(&self, group_id: &str) -> Result<()> {
        let user = self.ctx.require_user()?;
        if !self.is_admin_of(group_id).await? {
            return Err(AppError::Unauthorized(
                "only a group admin may delete the group".to_string(),
            ));
        }

        let members = self.members(group_id).await?;
        let member_collection = collections::group_members(group_id);

        let total = members.len();
        let results: Vec<Result<()>> = stream::iter(members)
            .map(|member| {
                let db = self.ctx.db.clone();
                let collection = member_collection.clone();
                async move { db.delete_doc(&collection, &member.id).await }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::error!(group_id, failed, total, "Member cascade left orphans");
            return Err(AppError::PartialCascade {
                deleted: total - failed,
                failed,
            });
        }

        self.ctx.db.delete_doc(collections::GROUPS, group_id).await?;
        self.patch_group_ids(&user.user_id, |ids| {
            ids.retain(|id| id != group_id);
        })
        .await?;

        tracing::info!(group_id, members = total, "Group deleted");
        Ok(())
    }

    /// Recompute `member_count` from the authoritative member set.
    /// Corrects drift accumulated by the increment-only mirror.
    pub async fn reconcile_member_count(&self, group_id: &str) -> Result<i64> {
        let members = self.members(group_id).await?;
        let count = members.len() as i64;
        self.ctx
            .db
            .update_fields(
                collections::GROUPS,
                group_id,
                serde_json::json!({ "memberCount": count }),
            )
            .await?;
        tracing::debug!(group_id, count, "Member count reconciled");
        Ok(count)
    }

    /// Read-modify-write the group-id list on a user profile.
    async fn patch_group_ids(
        &self,
        user_id: &str,
        mutate: impl FnOnce(&mut Vec<String>),
    ) -> Result<()> {
        let profile = self
            .ctx
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

        let mut group_ids = profile.group_ids;
        mutate(&mut group_ids);
        self.ctx
            .db
            .update_fields(
                collections::USERS,
                user_id,
                serde_json::json!({ "groupIds": group_ids }),
            )
            .await
    }
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}
