use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, StatusCode};
use url::Url;

use super::credentials::ServiceAccountTokenSource;
use crate::{
    entities::upload::UploadedFile,
    errors::StoreError,
    repositories::blob_store::{key_from_url, object_key, BlobStore},
};

const STORAGE_HOST: &str = "https://storage.googleapis.com";

/// Cloud Storage JSON API client for one bucket. Uploaded objects are
/// publicly readable.
pub struct GcsBlobStore {
    http: reqwest::Client,
    tokens: Arc<ServiceAccountTokenSource>,
    bucket: String,
}

impl GcsBlobStore {
    pub fn new(http: reqwest::Client, tokens: Arc<ServiceAccountTokenSource>, bucket: &str) -> Self {
        GcsBlobStore {
            http,
            tokens,
            bucket: bucket.to_string(),
        }
    }
}

fn url_with_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<Url, StoreError> {
    let mut url = Url::parse(STORAGE_HOST).map_err(|e| StoreError::Transport(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::Transport("storage host cannot be a base".into()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `https://storage.googleapis.com/<bucket>/<key>`, each key segment escaped.
fn public_url(bucket: &str, key: &str) -> Result<Url, StoreError> {
    url_with_segments(std::iter::once(bucket).chain(key.split('/')))
}

fn upload_url(bucket: &str, key: &str) -> Result<Url, StoreError> {
    let mut url = url_with_segments(["upload", "storage", "v1", "b", bucket, "o"])?;
    url.query_pairs_mut()
        .append_pair("uploadType", "media")
        .append_pair("name", key)
        .append_pair("predefinedAcl", "publicRead");
    Ok(url)
}

/// The object name is a single path segment, so its slashes are escaped.
fn object_url(bucket: &str, key: &str) -> Result<Url, StoreError> {
    url_with_segments(["storage", "v1", "b", bucket, "o", key])
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<String, StoreError> {
        let key = object_key(folder, &file.file_name, Utc::now().timestamp_millis());
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(upload_url(&self.bucket, &key)?)
            .bearer_auth(token)
            .header(CONTENT_TYPE, file.content_type.as_str())
            .body(file.bytes.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Permission(body),
                _ => StoreError::Transport(format!("upload of {key} failed ({status}): {body}")),
            });
        }

        tracing::info!(%key, size = file.bytes.len(), "Uploaded object");
        Ok(public_url(&self.bucket, &key)?.to_string())
    }

    async fn delete(&self, url: &str) -> Result<bool, StoreError> {
        let Some(raw_key) = key_from_url(url, &self.bucket) else {
            return Ok(false);
        };
        let key = urlencoding::decode(raw_key)
            .map_err(|e| StoreError::Decode(format!("object key {raw_key}: {e}")))?;
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .delete(object_url(&self.bucket, &key)?)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                tracing::info!(%key, "Deleted object");
                Ok(true)
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(key.into_owned())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::Transport(format!("delete of {key} failed ({status}): {body}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_escapes_each_segment() {
        let url = public_url("demo.appspot.com", "projects/1_my shot.png").unwrap();
        assert_eq!(url.as_str(), "https://storage.googleapis.com/demo.appspot.com/projects/1_my%20shot.png");
    }

    #[test]
    fn public_url_round_trips_through_key_extraction() {
        let url = public_url("demo.appspot.com", "resume/1_my cv.pdf").unwrap().to_string();
        let raw = key_from_url(&url, "demo.appspot.com").unwrap();
        assert_eq!(urlencoding::decode(raw).unwrap(), "resume/1_my cv.pdf");
    }

    #[test]
    fn object_url_keeps_the_key_in_one_segment() {
        let url = object_url("demo.appspot.com", "projects/1_shot.png").unwrap();
        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/storage/v1/b/demo.appspot.com/o/projects%2F1_shot.png"
        );
    }

    #[test]
    fn upload_url_requests_public_read() {
        let url = upload_url("demo.appspot.com", "skills/1_icon.svg").unwrap();
        assert_eq!(url.path(), "/upload/storage/v1/b/demo.appspot.com/o");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("name".into(), "skills/1_icon.svg".into())));
        assert!(pairs.contains(&("predefinedAcl".into(), "publicRead".into())));
    }
}
