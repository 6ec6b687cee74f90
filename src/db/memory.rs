// SPDX-License-Identifier: MIT

//! In-memory [`DocumentStore`] for tests and local development.
//!
//! Mimics the semantics the core relies on from a real document backend:
//! conjunctive filters, single-field ordering with document-id tie-break,
//! `start_after` resume positions, atomic field increments, and the 30-value
//! cap on `in` queries.

use crate::db::store::{Direction, Document, DocumentStore, Filter, QuerySpec, IN_QUERY_LIMIT};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{self, AtomicU64};
use std::sync::Mutex;

/// In-memory document store.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_id(&self) -> String {
        // Zero-padded so generated ids sort in creation order.
        let n = self.next_id.fetch_add(1, atomic::Ordering::SeqCst);
        format!("doc{:08}", n)
    }
}

/// Total order over JSON scalar values matching document-store sort rules:
/// null < bool < number < string.
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            _ => 4,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn field_of<'a>(data: &'a Value, field: &str) -> &'a Value {
    data.get(field).unwrap_or(&Value::Null)
}

fn matches(id: &str, data: &Value, filter: &Filter) -> Result<bool> {
    Ok(match filter {
        Filter::Eq(field, value) => field_of(data, field) == value,
        Filter::Gte(field, value) => {
            cmp_values(field_of(data, field), value) != Ordering::Less
        }
        Filter::Lte(field, value) => {
            cmp_values(field_of(data, field), value) != Ordering::Greater
        }
        Filter::In(field, values) => {
            if values.len() > IN_QUERY_LIMIT {
                return Err(AppError::Store(format!(
                    "'in' filter exceeds {} values",
                    IN_QUERY_LIMIT
                )));
            }
            values.contains(field_of(data, field))
        }
        Filter::IdIn(ids) => {
            if ids.len() > IN_QUERY_LIMIT {
                return Err(AppError::Store(format!(
                    "'in' filter exceeds {} values",
                    IN_QUERY_LIMIT
                )));
            }
            ids.iter().any(|candidate| candidate == id)
        }
        Filter::ArrayContains(field, value) => match field_of(data, field) {
            Value::Array(items) => items.contains(value),
            _ => false,
        },
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.lock().expect("store lock");
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<String> {
        let id = self.generate_id();
        let mut collections = self.collections.lock().expect("store lock");
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()> {
        let mut collections = self.collections.lock().expect("store lock");
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()> {
        let mut collections = self.collections.lock().expect("store lock");
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))?;

        let (Value::Object(existing), Value::Object(fields)) = (doc, patch) else {
            return Err(AppError::Store("update requires object documents".to_string()));
        };
        for (key, value) in fields {
            existing.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.lock().expect("store lock");
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn increment(&self, collection: &str, id: &str, field: &str, delta: i64) -> Result<()> {
        let mut collections = self.collections.lock().expect("store lock");
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))?;

        let Value::Object(existing) = doc else {
            return Err(AppError::Store("increment requires object documents".to_string()));
        };
        let current = existing
            .get(field)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        existing.insert(field.to_string(), Value::from(current + delta));
        Ok(())
    }

    async fn query(&self, collection: &str, spec: QuerySpec) -> Result<Vec<Document>> {
        let collections = self.collections.lock().expect("store lock");
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = Vec::new();
        for (id, data) in docs {
            let mut keep = true;
            for filter in &spec.filters {
                if !matches(id, data, filter)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matched.push(Document {
                    id: id.clone(),
                    data: data.clone(),
                });
            }
        }

        if let Some((field, direction)) = &spec.order_by {
            matched.sort_by(|a, b| {
                let ord = cmp_values(field_of(&a.data, field), field_of(&b.data, field))
                    .then_with(|| a.id.cmp(&b.id));
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });

            if let Some(cursor) = &spec.start_after {
                // Keep only documents strictly after the cursor position in
                // the sorted order.
                let after = |doc: &Document| {
                    let ord = cmp_values(field_of(&doc.data, field), &cursor.value)
                        .then_with(|| doc.id.cmp(&cursor.id));
                    match direction {
                        Direction::Ascending => ord == Ordering::Greater,
                        Direction::Descending => ord == Ordering::Less,
                    }
                };
                matched.retain(after);
            }
        }

        if let Some(limit) = spec.limit {
            matched.truncate(limit as usize);
        }

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_get_delete_round_trip() {
        let store = MemoryStore::new();
        let id = store
            .insert("things", json!({ "name": "a" }))
            .await
            .unwrap();
        let doc = store.get("things", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["name"], "a");

        store.delete("things", &id).await.unwrap();
        assert!(store.get("things", &id).await.unwrap().is_none());
        // Deleting again is a no-op
        store.delete("things", &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert("things", json!({ "a": 1, "b": 2 }))
            .await
            .unwrap();
        store
            .update("things", &id, json!({ "b": 3, "c": 4 }))
            .await
            .unwrap();
        let doc = store.get("things", &id).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({ "a": 1, "b": 3, "c": 4 }));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("things", "nope", json!({ "a": 1 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_increment_treats_missing_field_as_zero() {
        let store = MemoryStore::new();
        let id = store.insert("things", json!({})).await.unwrap();
        store.increment("things", &id, "count", 2).await.unwrap();
        store.increment("things", &id, "count", -1).await.unwrap();
        let doc = store.get("things", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["count"], 1);
    }

    #[tokio::test]
    async fn test_query_orders_descending_with_id_tiebreak() {
        let store = MemoryStore::new();
        for (date, tag) in [("2026-01-02", "b"), ("2026-01-03", "c"), ("2026-01-02", "a")] {
            store
                .insert("w", json!({ "date": date, "tag": tag }))
                .await
                .unwrap();
        }
        let docs = store
            .query(
                "w",
                QuerySpec::new().order_by("date", Direction::Descending),
            )
            .await
            .unwrap();
        let tags: Vec<_> = docs.iter().map(|d| d.data["tag"].clone()).collect();
        // Same-date docs tie-break by id, reversed along with the direction.
        assert_eq!(tags, vec![json!("c"), json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn test_query_start_after_resumes_past_cursor() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for date in ["2026-01-05", "2026-01-04", "2026-01-03"] {
            ids.push(store.insert("w", json!({ "date": date })).await.unwrap());
        }
        let docs = store
            .query(
                "w",
                QuerySpec::new()
                    .order_by("date", Direction::Descending)
                    .start_after(json!("2026-01-05"), &ids[0]),
            )
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].data["date"], "2026-01-04");
    }

    #[tokio::test]
    async fn test_in_filter_rejects_more_than_thirty_values() {
        let store = MemoryStore::new();
        store.insert("w", json!({ "k": "v" })).await.unwrap();
        let values: Vec<Value> = (0..31).map(|i| json!(i.to_string())).collect();
        let err = store
            .query(
                "w",
                QuerySpec::new().filter(Filter::In("k".to_string(), values)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[tokio::test]
    async fn test_array_contains_filter() {
        let store = MemoryStore::new();
        store
            .insert("w", json!({ "groupIds": ["g1", "g2"] }))
            .await
            .unwrap();
        store
            .insert("w", json!({ "groupIds": ["g3"] }))
            .await
            .unwrap();
        let docs = store
            .query(
                "w",
                QuerySpec::new().filter(Filter::ArrayContains(
                    "groupIds".to_string(),
                    json!("g2"),
                )),
            )
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
    }
}
