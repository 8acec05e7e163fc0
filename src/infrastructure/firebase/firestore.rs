use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    credentials::ServiceAccountTokenSource,
    value::{decode_fields, encode_fields},
};
use crate::{
    errors::StoreError,
    repositories::document_store::{Direction, Document, DocumentStore, Fields, OrderBy},
};

const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: &str = "300";

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Option<Value>,
}

impl RawDocument {
    fn into_document(self) -> Result<Document, StoreError> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StoreError::Decode(format!("document name without id: {}", self.name)))?
            .to_string();
        Ok(Document::new(id, decode_fields(self.fields.as_ref())?))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Firestore over its REST API, authenticated as the service account.
pub struct FirestoreClient {
    http: reqwest::Client,
    tokens: Arc<ServiceAccountTokenSource>,
    documents_url: String,
}

impl FirestoreClient {
    pub fn new(http: reqwest::Client, tokens: Arc<ServiceAccountTokenSource>, project_id: &str) -> Self {
        FirestoreClient {
            http,
            tokens,
            documents_url: format!("{FIRESTORE_API}/projects/{project_id}/databases/(default)/documents"),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_url, urlencoding::encode(collection))
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), urlencoding::encode(id))
    }

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, StoreError> {
        let token = self.tokens.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send(builder: RequestBuilder, target: &str) -> Result<Response, StoreError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => StoreError::NotFound(target.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StoreError::Permission(format!("{target}: {body}"))
            }
            _ => StoreError::Transport(format!("{target} ({status}): {body}")),
        })
    }
}

fn order_param(order: &OrderBy) -> String {
    match order.direction {
        Direction::Ascending => order.field.clone(),
        Direction::Descending => format!("{} desc", order.field),
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list(&self, collection: &str, order_by: Option<OrderBy>) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(collection);
        let order = order_by.as_ref().map(order_param);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![("pageSize", PAGE_SIZE)];
            if let Some(order) = order.as_deref() {
                query.push(("orderBy", order));
            }
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let builder = self.request(Method::GET, &url).await?.query(&query);
            let page: ListResponse = Self::send(builder, collection).await?.json().await?;

            for raw in page.documents {
                documents.push(raw.into_document()?);
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(collection, count = documents.len(), "Listed documents");
        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let builder = self.request(Method::GET, &self.document_url(collection, id)).await?;
        match Self::send(builder, &format!("{collection}/{id}")).await {
            Ok(response) => Ok(Some(response.json::<RawDocument>().await?.into_document()?)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let builder = self
            .request(Method::POST, &self.collection_url(collection))
            .await?
            .json(&json!({ "fields": encode_fields(&fields) }));

        let created: RawDocument = Self::send(builder, collection).await?.json().await?;
        Ok(created.into_document()?.id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let builder = self
            .request(Method::PATCH, &self.document_url(collection, id))
            .await?
            .json(&json!({ "fields": encode_fields(&fields) }));

        Self::send(builder, &format!("{collection}/{id}")).await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut query: Vec<(&str, &str)> = vec![("currentDocument.exists", "true")];
        query.extend(fields.keys().map(|key| ("updateMask.fieldPaths", key.as_str())));

        let builder = self
            .request(Method::PATCH, &self.document_url(collection, id))
            .await?
            .query(&query)
            .json(&json!({ "fields": encode_fields(&fields) }));

        Self::send(builder, &format!("{collection}/{id}")).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let builder = self
            .request(Method::DELETE, &self.document_url(collection, id))
            .await?
            .query(&[("currentDocument.exists", "true")]);

        Self::send(builder, &format!("{collection}/{id}")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_is_the_last_name_segment() {
        let raw = RawDocument {
            name: "projects/demo/databases/(default)/documents/projects/abc123".into(),
            fields: Some(json!({"title": {"stringValue": "Site"}})),
        };
        let doc = raw.into_document().unwrap();
        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.fields["title"], "Site");
    }

    #[test]
    fn descending_order_is_suffixed() {
        assert_eq!(order_param(&OrderBy::asc("order")), "order");
        assert_eq!(order_param(&OrderBy::desc("createdAt")), "createdAt desc");
    }

    #[test]
    fn empty_list_page_decodes() {
        let page: ListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
