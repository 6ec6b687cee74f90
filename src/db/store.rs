// SPDX-License-Identifier: MIT

//! Abstract document-store contract.
//!
//! The core never talks to a concrete backend; it consumes this trait.
//! Production deployments plug in a Firestore-style document database,
//! tests and local development use [`crate::db::MemoryStore`].

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Hard backend constraint: membership (`in`) queries accept at most this
/// many values per lookup. Larger sets must be chunked by the caller.
pub const IN_QUERY_LIMIT: usize = 30;

/// A raw document with its backend-assigned id.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// A typed document with its id.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub id: String,
    pub doc: T,
}

/// Query filter. All filters combine conjunctively.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Field equals value.
    Eq(String, Value),
    /// Field greater than or equal to value.
    Gte(String, Value),
    /// Field less than or equal to value.
    Lte(String, Value),
    /// Field value is one of the given values (at most [`IN_QUERY_LIMIT`]).
    In(String, Vec<Value>),
    /// Document id is one of the given ids (at most [`IN_QUERY_LIMIT`]).
    IdIn(Vec<String>),
    /// Array field contains the given value.
    ArrayContains(String, Value),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Resume position for forward-only paging: the sort-key value and id of
/// the last document of the previous page.
#[derive(Debug, Clone)]
pub struct StartAfter {
    pub value: Value,
    pub id: String,
}

/// A structured query against one collection.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<u32>,
    pub start_after: Option<StartAfter>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_after(mut self, value: Value, id: &str) -> Self {
        self.start_after = Some(StartAfter {
            value,
            id: id.to_string(),
        });
        self
    }
}

/// Asynchronous document-store operations consumed by the core.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Insert a document with a backend-generated id; returns the id.
    async fn insert(&self, collection: &str, data: Value) -> Result<String>;

    /// Create or replace a document at a known id.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()>;

    /// Merge the top-level fields of `patch` into an existing document.
    /// Fails with `NotFound` if the document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Atomically add `delta` to a numeric field. Missing fields count as 0.
    async fn increment(&self, collection: &str, id: &str, field: &str, delta: i64) -> Result<()>;

    /// Run a structured query.
    async fn query(&self, collection: &str, spec: QuerySpec) -> Result<Vec<Document>>;
}
