// SPDX-License-Identifier: MIT

//! Ranking service: resolves a scope to user and record sets, then hands
//! off to the pure ranking reduction.

use crate::db::{collections, Filter, QuerySpec, Stored};
use crate::error::Result;
use crate::models::workout::WorkoutDoc;
use crate::models::{GroupMemberDoc, RankedUser, UserProfile};
use crate::session::SessionContext;
use crate::stats::ranking::{rank_users, RankingScope};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Cross-user rankings for one session.
pub struct RankingService {
    ctx: Arc<SessionContext>,
}

impl RankingService {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    /// Produce ranking rows for the given scope.
    ///
    /// Independent reads (users and workouts) are issued concurrently and
    /// joined before the reduction.
    pub async fn aggregate_rankings(&self, scope: RankingScope) -> Result<Vec<RankedUser>> {
        let group_scoped = scope.is_group_scoped();
        let (users, workouts) = match scope {
            RankingScope::All => {
                let (users, workouts) = tokio::join!(
                    self.ctx
                        .db
                        .query_docs::<UserProfile>(collections::USERS, QuerySpec::new()),
                    self.ctx
                        .db
                        .query_docs::<WorkoutDoc>(collections::WORKOUTS, QuerySpec::new()),
                );
                (users?, workouts?)
            }
            RankingScope::Group(group_id) => {
                let member_ids = self.member_ids(std::slice::from_ref(&group_id)).await?;
                if member_ids.is_empty() {
                    return Ok(Vec::new());
                }
                let (users, workouts) = tokio::join!(
                    self.ctx
                        .db
                        .get_by_ids::<UserProfile>(collections::USERS, &member_ids),
                    // Only records visible within the group count here.
                    self.ctx.db.query_docs::<WorkoutDoc>(
                        collections::WORKOUTS,
                        QuerySpec::new().filter(Filter::ArrayContains(
                            "groupIds".to_string(),
                            Value::from(group_id.as_str()),
                        )),
                    ),
                );
                (users?, workouts?)
            }
            RankingScope::MyGroups(group_ids) => {
                let member_ids = self.member_ids(&group_ids).await?;
                if member_ids.is_empty() {
                    return Ok(Vec::new());
                }
                let values: Vec<Value> = member_ids
                    .iter()
                    .map(|id| Value::from(id.as_str()))
                    .collect();
                let (users, workouts) = tokio::join!(
                    self.ctx
                        .db
                        .get_by_ids::<UserProfile>(collections::USERS, &member_ids),
                    self.ctx.db.query_value_chunks::<WorkoutDoc>(
                        collections::WORKOUTS,
                        &[],
                        "userId",
                        &values,
                    ),
                );
                (users?, workouts?)
            }
        };

        let records: Vec<WorkoutDoc> = workouts.into_iter().map(|w| w.doc).collect();
        Ok(rank_users(&users, &records, group_scoped))
    }

    /// Union of member user-ids across the given groups, deduplicated and
    /// in stable order.
    async fn member_ids(&self, group_ids: &[String]) -> Result<Vec<String>> {
        let mut ids: BTreeSet<String> = BTreeSet::new();
        for group_id in group_ids {
            let members: Vec<Stored<GroupMemberDoc>> = self
                .ctx
                .db
                .query_docs(&collections::group_members(group_id), QuerySpec::new())
                .await?;
            ids.extend(members.into_iter().map(|m| m.doc.user_id));
        }
        Ok(ids.into_iter().collect())
    }
}
