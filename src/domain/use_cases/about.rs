use std::sync::Arc;

use tracing::instrument;

use crate::{
    constants::{ABOUT_COLLECTION, ABOUT_DOCUMENT_ID, PROFILE_IMAGE_FOLDER, RESUME_FOLDER},
    entities::{
        about::{About, AboutInput, AboutMedia, SocialLinks},
        stored_now,
        upload::UploadedFile,
    },
    errors::AppError,
    repositories::{
        blob_store::BlobStore,
        document_store::{to_fields, DocumentStore},
    },
    use_cases::media::{discard_blob, replace_blob},
    utils::form_fields::non_empty,
};

/// The About section is one document under a well-known id.
pub struct AboutHandler {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl AboutHandler {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        AboutHandler { documents, blobs }
    }

    /// Returns the stored About section, or the empty shape before the first update.
    #[instrument(skip(self))]
    pub async fn get_about(&self) -> Result<About, AppError> {
        const FAILED: &str = "Failed to fetch about data";

        match self.documents
            .get(ABOUT_COLLECTION, ABOUT_DOCUMENT_ID)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?
        {
            Some(doc) => doc.into_entity().map_err(|e| AppError::internal(FAILED, e)),
            None => Ok(About::default()),
        }
    }

    /// Creates the section on first use; later calls keep any field that was
    /// not submitted or was submitted empty.
    #[instrument(skip(self, input, media))]
    pub async fn update_about(
        &self,
        input: AboutInput,
        media: AboutMedia<UploadedFile>,
    ) -> Result<About, AppError> {
        const FAILED: &str = "Failed to update about data";

        let current = self.get_about().await?;

        let profile_image_url = replace_blob(
            self.blobs.as_ref(),
            current.profile_image_url,
            media.profile_image.as_ref(),
            PROFILE_IMAGE_FOLDER,
        )
        .await
        .map_err(|e| AppError::internal(FAILED, e))?;
        let resume_url =
            match replace_blob(self.blobs.as_ref(), current.resume_url, media.resume.as_ref(), RESUME_FOLDER).await {
                Ok(url) => url,
                Err(e) => {
                    if media.profile_image.is_some() {
                        discard_blob(self.blobs.as_ref(), profile_image_url.as_deref()).await;
                    }
                    return Err(AppError::internal(FAILED, e));
                }
            };

        let now = stored_now();
        let about = About {
            id: Some(ABOUT_DOCUMENT_ID.to_string()),
            bio: non_empty(input.bio).unwrap_or(current.bio),
            profile_image_url,
            resume_url,
            social: SocialLinks {
                github: non_empty(input.github).unwrap_or(current.social.github),
                linkedin: non_empty(input.linkedin).unwrap_or(current.social.linkedin),
                twitter: non_empty(input.twitter).unwrap_or(current.social.twitter),
                email: non_empty(input.email).unwrap_or(current.social.email),
            },
            created_at: current.created_at.or(Some(now)),
            updated_at: Some(now),
        };

        let fields = to_fields(&about).map_err(|e| AppError::internal(FAILED, e))?;
        self.documents
            .set(ABOUT_COLLECTION, ABOUT_DOCUMENT_ID, fields)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?;

        Ok(about)
    }
}
