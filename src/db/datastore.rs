// SPDX-License-Identifier: MIT

//! Typed datastore wrapper over the abstract [`DocumentStore`].
//!
//! Adds per-call timeouts, serde (de)serialization of entity types, and the
//! chunked membership lookups required by the backend's 30-value cap on
//! `in` queries.

use crate::db::collections;
use crate::db::store::{
    Direction, Document, DocumentStore, Filter, QuerySpec, Stored, IN_QUERY_LIMIT,
};
use crate::error::{AppError, Result};
use crate::models::{UserProfile, UserStats, WorkoutDoc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Typed database client.
#[derive(Clone)]
pub struct Datastore {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

fn decode<T: DeserializeOwned>(doc: Document) -> Result<Stored<T>> {
    let data = serde_json::from_value(doc.data)
        .map_err(|e| AppError::Store(format!("malformed document {}: {}", doc.id, e)))?;
    Ok(Stored { id: doc.id, doc: data })
}

fn encode<T: Serialize>(doc: &T) -> Result<Value> {
    serde_json::to_value(doc).map_err(|e| AppError::Store(format!("serialize failed: {}", e)))
}

impl Datastore {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Run a store call with the configured request timeout.
    async fn with_timeout<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(what.to_string())),
        }
    }

    // ─── Generic Typed Operations ────────────────────────────────

    pub async fn get_doc<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Stored<T>>> {
        let doc = self
            .with_timeout("get", self.store.get(collection, id))
            .await?;
        doc.map(decode).transpose()
    }

    pub async fn insert_doc<T: Serialize>(&self, collection: &str, doc: &T) -> Result<String> {
        let data = encode(doc)?;
        self.with_timeout("insert", self.store.insert(collection, data))
            .await
    }

    pub async fn set_doc<T: Serialize>(&self, collection: &str, id: &str, doc: &T) -> Result<()> {
        let data = encode(doc)?;
        self.with_timeout("set", self.store.set(collection, id, data))
            .await
    }

    pub async fn update_fields(&self, collection: &str, id: &str, patch: Value) -> Result<()> {
        self.with_timeout("update", self.store.update(collection, id, patch))
            .await
    }

    pub async fn delete_doc(&self, collection: &str, id: &str) -> Result<()> {
        self.with_timeout("delete", self.store.delete(collection, id))
            .await
    }

    pub async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<()> {
        self.with_timeout("increment", self.store.increment(collection, id, field, delta))
            .await
    }

    pub async fn query_docs<T: DeserializeOwned>(
        &self,
        collection: &str,
        spec: QuerySpec,
    ) -> Result<Vec<Stored<T>>> {
        let docs = self
            .with_timeout("query", self.store.query(collection, spec))
            .await?;
        docs.into_iter().map(decode).collect()
    }

    // ─── Chunked Membership Lookups ──────────────────────────────

    /// Fetch documents by id, chunking into `in` lookups of at most 30 ids
    /// and merging the results without duplicates.
    pub async fn get_by_ids<T: DeserializeOwned>(
        &self,
        collection: &str,
        ids: &[String],
    ) -> Result<Vec<Stored<T>>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut merged = Vec::new();
        for chunk in ids.chunks(IN_QUERY_LIMIT) {
            let spec = QuerySpec::new().filter(Filter::IdIn(chunk.to_vec()));
            for doc in self.query_docs::<T>(collection, spec).await? {
                if seen.insert(doc.id.clone()) {
                    merged.push(doc);
                }
            }
        }
        Ok(merged)
    }

    /// Run one query per chunk of `values` (at most 30 each), applying
    /// `base_filters` to every chunk, and merge results without duplicates.
    pub async fn query_value_chunks<T: DeserializeOwned>(
        &self,
        collection: &str,
        base_filters: &[Filter],
        field: &str,
        values: &[Value],
    ) -> Result<Vec<Stored<T>>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut merged = Vec::new();
        for chunk in values.chunks(IN_QUERY_LIMIT) {
            let mut spec = QuerySpec::new();
            for filter in base_filters {
                spec = spec.filter(filter.clone());
            }
            spec = spec.filter(Filter::In(field.to_string(), chunk.to_vec()));
            for doc in self.query_docs::<T>(collection, spec).await? {
                if seen.insert(doc.id.clone()) {
                    merged.push(doc);
                }
            }
        }
        Ok(merged)
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self
            .get_doc::<UserProfile>(collections::USERS, user_id)
            .await?
            .map(|stored| stored.doc))
    }

    /// Persist recomputed stats on the user profile.
    pub async fn set_user_stats(&self, user_id: &str, stats: &UserStats) -> Result<()> {
        self.update_fields(
            collections::USERS,
            user_id,
            serde_json::json!({ "stats": encode(stats)? }),
        )
        .await
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// All of one user's workouts, date descending.
    pub async fn workouts_for_user(&self, user_id: &str) -> Result<Vec<Stored<WorkoutDoc>>> {
        self.query_docs(
            collections::WORKOUTS,
            QuerySpec::new()
                .filter(Filter::Eq("userId".to_string(), Value::from(user_id)))
                .order_by("date", Direction::Descending),
        )
        .await
    }
}
