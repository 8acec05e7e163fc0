use tracing::warn;

use crate::{
    entities::upload::UploadedFile,
    errors::StoreError,
    repositories::blob_store::BlobStore,
};

/// Deletes a stored blob, logging instead of failing. A failure leaves an
/// orphaned object behind.
pub async fn discard_blob(blobs: &dyn BlobStore, url: Option<&str>) {
    let Some(url) = url else {
        return;
    };
    match blobs.delete(url).await {
        Ok(true) => {}
        Ok(false) => warn!(%url, "Blob URL does not belong to the bucket, nothing deleted"),
        Err(e) => warn!(%url, error = %e, "Failed to delete blob"),
    }
}

/// Swaps `current` for a fresh upload when a replacement file is given.
/// The old blob is removed first on a best-effort basis.
pub async fn replace_blob(
    blobs: &dyn BlobStore,
    current: Option<String>,
    replacement: Option<&UploadedFile>,
    folder: &str,
) -> Result<Option<String>, StoreError> {
    match replacement {
        Some(file) => {
            discard_blob(blobs, current.as_deref()).await;
            blobs.upload(file, folder).await.map(Some)
        }
        None => Ok(current),
    }
}
