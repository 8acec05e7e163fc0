use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::StoreError;

pub type Fields = Map<String, Value>;

/// One stored record: the store-assigned id plus its schemaless fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Document { id: id.into(), fields }
    }

    /// Deserializes the fields into `T`, exposing the document id as `id`.
    pub fn into_entity<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Serializes an entity into storable fields. The `id` key is dropped; the
/// store owns ids.
pub fn to_fields<T: Serialize>(entity: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(entity)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(StoreError::Decode(format!("expected an object, got {other}"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: &str) -> Self {
        OrderBy { field: field.to_string(), direction: Direction::Ascending }
    }

    pub fn desc(field: &str) -> Self {
        OrderBy { field: field.to_string(), direction: Direction::Descending }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists a collection, optionally ordered by one field. An ordered list
    /// leaves out documents that lack the field; ties keep the store's own
    /// order.
    async fn list(&self, collection: &str, order_by: Option<OrderBy>) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Adds a document under a store-assigned id and returns that id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Creates or fully replaces the document with the given id.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Overwrites the given fields of an existing document.
    /// Fails with `StoreError::NotFound` when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Fails with `StoreError::NotFound` when the document does not exist.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        #[serde(default)]
        id: String,
        name: String,
    }

    #[test]
    fn to_fields_drops_the_id() {
        let fields = to_fields(&Item { id: "abc".into(), name: "x".into() }).unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["name"], "x");
    }

    #[test]
    fn into_entity_restores_the_id() {
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::String("x".into()));
        let item: Item = Document::new("abc", fields).into_entity().unwrap();
        assert_eq!(item, Item { id: "abc".into(), name: "x".into() });
    }
}
