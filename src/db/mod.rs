// SPDX-License-Identifier: MIT

//! Database layer: abstract store contract plus the typed client.

pub mod datastore;
pub mod memory;
pub mod store;

pub use datastore::Datastore;
pub use memory::MemoryStore;
pub use store::{
    Direction, Document, DocumentStore, Filter, QuerySpec, StartAfter, Stored, IN_QUERY_LIMIT,
};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const WORKOUTS: &str = "workouts";
    pub const LIKES: &str = "likes";
    pub const COMMENTS: &str = "comments";
    pub const GROUPS: &str = "groups";
    pub const EVENTS: &str = "events";

    /// Member subcollection of one group.
    pub fn group_members(group_id: &str) -> String {
        format!("{}/{}/members", GROUPS, group_id)
    }

    /// Monthly-goals subcollection of one user.
    pub fn monthly_goals(user_id: &str) -> String {
        format!("{}/{}/monthlyGoals", USERS, user_id)
    }
}
