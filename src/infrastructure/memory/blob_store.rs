use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::{
    entities::upload::UploadedFile,
    errors::StoreError,
    repositories::blob_store::{key_from_url, object_key, BlobStore},
};

const PUBLIC_HOST: &str = "https://storage.googleapis.com";

/// Keeps uploaded objects in memory and hands out URLs shaped like the
/// hosted bucket's, so URL-based deletion behaves the same.
pub struct MemoryBlobStore {
    bucket: String,
    objects: DashMap<String, UploadedFile>,
}

impl MemoryBlobStore {
    pub fn new(bucket: &str) -> Self {
        MemoryBlobStore {
            bucket: bucket.to_string(),
            objects: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        key_from_url(url, &self.bucket).is_some_and(|key| self.objects.contains_key(key))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<String, StoreError> {
        let key = object_key(folder, &file.file_name, Utc::now().timestamp_millis());
        let url = format!("{PUBLIC_HOST}/{}/{key}", self.bucket);
        self.objects.insert(key, file.clone());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<bool, StoreError> {
        let Some(key) = key_from_url(url, &self.bucket) else {
            return Ok(false);
        };
        self.objects
            .remove(key)
            .map(|_| true)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}
