use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    errors::StoreError,
    repositories::document_store::{Direction, Document, DocumentStore, Fields, OrderBy},
};

/// Auto ids are 20 characters, like the hosted store's.
const AUTO_ID_LEN: usize = 20;

/// Collections held in process memory, each in insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn auto_id() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(AUTO_ID_LEN);
        id
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str, order_by: Option<OrderBy>) -> Result<Vec<Document>, StoreError> {
        let mut docs = self
            .collections
            .get(collection)
            .map(|docs| docs.clone())
            .unwrap_or_default();

        if let Some(order) = order_by {
            // An ordered query only returns documents that have the field.
            docs.retain(|doc| doc.fields.contains_key(&order.field));
            // Vec::sort_by is stable, so ties keep insertion order.
            docs.sort_by(|a, b| {
                let ordering = compare_values(&a.fields[&order.field], &b.fields[&order.field]);
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = Self::auto_id();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => doc.fields = fields,
            None => docs.push(Document::new(id, fields)),
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        let doc = docs
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        doc.fields.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        let position = docs
            .iter()
            .position(|doc| doc.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        docs.remove(position);
        Ok(())
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (a, b) => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Cross-type order: null, bool, number, string, array, object.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    async fn names(store: &MemoryDocumentStore, order: Option<OrderBy>) -> Vec<String> {
        store
            .list("items", order)
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.fields["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_rt::test]
    async fn auto_ids_are_unique_and_twenty_chars() {
        let store = MemoryDocumentStore::new();
        let a = store.add("items", Fields::new()).await.unwrap();
        let b = store.add("items", Fields::new()).await.unwrap();
        assert_eq!(a.len(), 20);
        assert_ne!(a, b);
    }

    #[actix_rt::test]
    async fn ordering_is_stable_and_skips_documents_without_the_field() {
        let store = MemoryDocumentStore::new();
        for doc in [
            json!({"name": "late", "order": 5}),
            json!({"name": "unordered"}),
            json!({"name": "first", "order": 1}),
            json!({"name": "tie", "order": 5}),
        ] {
            store.add("items", fields(doc)).await.unwrap();
        }

        assert_eq!(names(&store, Some(OrderBy::asc("order"))).await, ["first", "late", "tie"]);
        assert_eq!(names(&store, Some(OrderBy::desc("order"))).await, ["late", "tie", "first"]);
        assert_eq!(names(&store, None).await, ["late", "unordered", "first", "tie"]);
    }

    #[actix_rt::test]
    async fn stored_timestamps_order_as_text() {
        let store = MemoryDocumentStore::new();
        store.add("items", fields(json!({"name": "old", "createdAt": "2024-01-01T00:00:00.500Z"}))).await.unwrap();
        store.add("items", fields(json!({"name": "new", "createdAt": "2024-01-01T00:00:01.000Z"}))).await.unwrap();
        store.add("items", fields(json!({"name": "oldest", "createdAt": "2023-12-31T23:59:59.999Z"}))).await.unwrap();

        assert_eq!(names(&store, Some(OrderBy::desc("createdAt"))).await, ["new", "old", "oldest"]);
    }

    #[actix_rt::test]
    async fn update_merges_and_missing_documents_are_not_found() {
        let store = MemoryDocumentStore::new();
        let id = store.add("items", fields(json!({"name": "a", "read": false}))).await.unwrap();

        store.update("items", &id, fields(json!({"read": true}))).await.unwrap();
        let doc = store.get("items", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields, fields(json!({"name": "a", "read": true})));

        assert!(store.update("items", "missing", Fields::new()).await.unwrap_err().is_not_found());
        assert!(store.delete("other", &id).await.unwrap_err().is_not_found());

        store.delete("items", &id).await.unwrap();
        assert!(store.get("items", &id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn set_creates_then_replaces() {
        let store = MemoryDocumentStore::new();
        store.set("about", "profile", fields(json!({"bio": "a", "old": 1}))).await.unwrap();
        store.set("about", "profile", fields(json!({"bio": "b"}))).await.unwrap();

        let docs = store.list("about", None).await.unwrap();
        assert_eq!(docs, vec![Document::new("profile", fields(json!({"bio": "b"})))]);
    }
}
