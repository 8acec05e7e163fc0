use async_trait::async_trait;

use crate::{entities::upload::UploadedFile, errors::StoreError};

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the file under `folder/<millis>_<file name>`, makes it public and
    /// returns its URL.
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<String, StoreError>;

    /// Deletes the object a public URL points at. Returns `Ok(false)` when the
    /// URL does not belong to this store's bucket.
    async fn delete(&self, url: &str) -> Result<bool, StoreError>;
}

/// Two uploads of the same name within one millisecond collide.
pub fn object_key(folder: &str, file_name: &str, millis: i64) -> String {
    format!("{folder}/{millis}_{file_name}")
}

/// Extracts the object key from a public URL by splitting on `<bucket>/`.
pub fn key_from_url<'a>(url: &'a str, bucket: &str) -> Option<&'a str> {
    let marker = format!("{bucket}/");
    url.split_once(marker.as_str())
        .map(|(_, key)| key)
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_prefixes_folder_and_timestamp() {
        assert_eq!(object_key("projects", "shot.png", 1700000000123), "projects/1700000000123_shot.png");
    }

    #[test]
    fn key_is_taken_after_the_bucket_name() {
        let url = "https://storage.googleapis.com/demo.appspot.com/projects/1_shot.png";
        assert_eq!(key_from_url(url, "demo.appspot.com"), Some("projects/1_shot.png"));
    }

    #[test]
    fn foreign_or_truncated_urls_have_no_key() {
        assert_eq!(key_from_url("https://example.com/img.png", "demo.appspot.com"), None);
        assert_eq!(key_from_url("https://storage.googleapis.com/demo.appspot.com/", "demo.appspot.com"), None);
        assert_eq!(key_from_url("", "demo.appspot.com"), None);
    }
}
